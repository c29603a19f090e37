//! Render one template against many data files concurrently.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;

use super::common::{TemplateSource, enforce_strict, print_diagnostics, read_template};
use crate::config::Config;
use crate::constants::BATCH_OUTPUT_EXTENSION;
use crate::context::load_context_file;
use crate::templating::{CompiledTemplate, Diagnostic, TemplateCache};

/// Render a template once per data file.
///
/// The template is compiled once and the tree is shared by all renders.
/// Each `<name>.<ext>` data file produces `<out-dir>/<name>.out`.
///
/// # Examples
/// ```bash
/// docgen batch invoice.txt orders/*.json --out-dir rendered/
/// docgen batch invoice.txt a.yaml b.yaml --out-dir out --max-parallel 2
/// ```
#[derive(Args, Debug)]
pub struct BatchCommand {
    /// Template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Data files, one rendered document each
    #[arg(value_name = "DATA", required = true)]
    pub data: Vec<PathBuf>,

    /// Directory for the rendered files (created if missing)
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Maximum concurrent renders (defaults to the config, then CPU count)
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Fail if any document reports a diagnostic
    #[arg(long)]
    pub strict: bool,
}

/// Result of rendering one data file.
#[derive(Debug)]
struct BatchItem {
    data: PathBuf,
    output: PathBuf,
    diagnostics: Vec<Diagnostic>,
}

impl BatchCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let source = read_template(&self.template, config).await?;
        let cache = TemplateCache::new();
        let compiled = cache.get_or_compile(&source.id(), &source.raw)?;

        let outputs = output_paths(&self.data, &self.out_dir)?;
        fs::create_dir_all(&self.out_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;

        let limit = self.max_parallel.unwrap_or_else(|| config.parallelism()).max(1);
        tracing::debug!("Rendering {} documents with up to {} in parallel", self.data.len(), limit);
        let semaphore = Arc::new(Semaphore::new(limit));

        let futures: Vec<_> = self
            .data
            .iter()
            .cloned()
            .zip(outputs)
            .map(|(data, output)| {
                let semaphore = Arc::clone(&semaphore);
                let compiled = Arc::clone(&compiled);
                async move {
                    let _permit = semaphore.acquire_owned().await.context("Render pool closed")?;
                    render_one(compiled, data, output).await
                }
            })
            .collect();

        let results: Vec<Result<BatchItem>> = join_all(futures).await;
        let items: Vec<BatchItem> = results.into_iter().collect::<Result<_>>()?;

        let mut total = 0;
        for item in &items {
            total += item.diagnostics.len();
            report(&source, item);
        }
        println!("Rendered {} document(s) into {}", items.len(), self.out_dir.display());

        enforce_strict(self.strict || config.strict, total)
    }
}

async fn render_one(
    compiled: Arc<CompiledTemplate>,
    data: PathBuf,
    output: PathBuf,
) -> Result<BatchItem> {
    let context = load_context_file(&data).await?;

    // Rendering is CPU-bound; keep it off the async workers
    let outcome = tokio::task::spawn_blocking(move || compiled.render(&context))
        .await
        .context("Render task panicked")?;

    fs::write(&output, &outcome.output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!("Wrote {}", output.display());

    Ok(BatchItem {
        data,
        output,
        diagnostics: outcome.diagnostics,
    })
}

fn report(source: &TemplateSource, item: &BatchItem) {
    if item.diagnostics.is_empty() {
        println!("{} {} -> {}", "✓".green(), item.data.display(), item.output.display());
    } else {
        println!(
            "{} {} -> {} ({} diagnostic(s))",
            "⚠".yellow(),
            item.data.display(),
            item.output.display(),
            item.diagnostics.len()
        );
        print_diagnostics(source, &item.diagnostics, None);
    }
}

/// `<out_dir>/<stem>.out` for every data file; stems must be unique.
fn output_paths(data: &[PathBuf], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut outputs = Vec::with_capacity(data.len());
    for path in data {
        let Some(stem) = path.file_stem() else {
            bail!("Data file {} has no file name", path.display());
        };
        if !seen.insert(stem.to_os_string()) {
            bail!(
                "Two data files share the name '{}'; their outputs would overwrite each other",
                stem.to_string_lossy()
            );
        }
        let mut name = stem.to_os_string();
        name.push(".");
        name.push(BATCH_OUTPUT_EXTENSION);
        outputs.push(out_dir.join(name));
    }
    Ok(outputs)
}
