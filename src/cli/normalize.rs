//! Print the repaired form of a template.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use super::common::{print_diagnostics, read_template};
use crate::config::Config;
use crate::templating::export::{to_directives, to_mustache};
use crate::templating::normalizer::normalize;
use crate::templating::scanner::scan;

/// Normalize a template's section nesting.
///
/// Orphan `{#end}` tags stay as text and unclosed sections are closed at the
/// end. Open/close counts are printed to stderr.
///
/// # Examples
/// ```bash
/// docgen normalize draft.txt > fixed.txt
/// docgen normalize draft.txt --mustache
/// ```
#[derive(Args, Debug)]
pub struct NormalizeCommand {
    /// Template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Emit Mustache syntax (`{{#name}}`, `{{/name}}`, `{{var}}`)
    #[arg(long)]
    pub mustache: bool,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl NormalizeCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let source = read_template(&self.template, config).await?;
        let normalized = normalize(scan(&source.raw));

        let text = if self.mustache {
            to_mustache(&normalized.tokens)
        } else {
            to_directives(&normalized.tokens)
        };

        match &self.output {
            Some(path) => fs::write(path, &text)
                .await
                .with_context(|| format!("Failed to write output to {}", path.display()))?,
            None => print!("{text}"),
        }

        eprintln!("opens={} closes={}", normalized.open_count(), normalized.close_count());
        print_diagnostics(&source, &normalized.diagnostics, None);
        Ok(())
    }
}
