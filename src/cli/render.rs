//! Render one template against layered data files.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use tokio::fs;

use super::common::{OutputFormat, enforce_strict, print_diagnostics, read_template};
use crate::config::Config;
use crate::context::load_layers;
use crate::templating::compile;

/// Render a template to stdout or a file.
///
/// # Examples
/// ```bash
/// docgen render invoice.txt --data invoice.json
/// docgen render invoice.txt -d base.toml -d order.json -o out.txt
/// docgen render invoice.txt -d order.yaml --format json
/// ```
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Data file (.json, .toml, .yaml); repeat to layer, later files win
    #[arg(short, long = "data", value_name = "FILE")]
    pub data: Vec<PathBuf>,

    /// Write the rendered output here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail if any diagnostic is reported
    #[arg(long)]
    pub strict: bool,
}

impl RenderCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let source = read_template(&self.template, config).await?;
        let context = load_layers(&self.data).await?;

        let compiled = compile(&source.raw)?;
        let outcome = compiled.render(&context);
        tracing::debug!(
            "Rendered {} ({} bytes, {} diagnostics)",
            source.id(),
            outcome.output.len(),
            outcome.diagnostics.len()
        );

        match self.format {
            OutputFormat::Text => {
                match &self.output {
                    Some(path) => fs::write(path, &outcome.output)
                        .await
                        .with_context(|| format!("Failed to write output to {}", path.display()))?,
                    None => print!("{}", outcome.output),
                }
                print_diagnostics(&source, &outcome.diagnostics, Some(&context));
            }
            OutputFormat::Json => {
                let diagnostics: Vec<_> = outcome
                    .diagnostics
                    .iter()
                    .map(|d| {
                        let (line, column) = source.line_col(d);
                        json!({
                            "kind": d.kind,
                            "path": d.path,
                            "position": d.position,
                            "line": line,
                            "column": column,
                        })
                    })
                    .collect();
                let document = json!({
                    "output": outcome.output,
                    "diagnostics": diagnostics,
                });
                let text = serde_json::to_string_pretty(&document)?;
                match &self.output {
                    Some(path) => fs::write(path, text)
                        .await
                        .with_context(|| format!("Failed to write output to {}", path.display()))?,
                    None => println!("{text}"),
                }
            }
        }

        enforce_strict(self.strict || config.strict, outcome.diagnostics.len())
    }
}
