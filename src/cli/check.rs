//! Compile templates and report nesting repairs.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

use super::common::{OutputFormat, enforce_strict, format_diagnostic, read_template};
use crate::config::Config;
use crate::templating::TemplateCache;

/// Check templates for unbalanced sections.
///
/// # Examples
/// ```bash
/// docgen check templates/*.txt
/// docgen check invoice.txt --strict
/// ```
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Template files
    #[arg(value_name = "TEMPLATE", required = true)]
    pub templates: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail if any template needed repairs
    #[arg(long)]
    pub strict: bool,
}

impl CheckCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let cache = TemplateCache::new();
        let mut total = 0;
        let mut reports = Vec::with_capacity(self.templates.len());

        for path in &self.templates {
            let source = read_template(path, config).await?;
            let compiled = cache.get_or_compile(&source.id(), &source.raw)?;
            total += compiled.diagnostics().len();

            match self.format {
                OutputFormat::Text => {
                    if compiled.is_well_formed() {
                        println!("{} {}", "✓".green(), source.path.display());
                    } else {
                        println!(
                            "{} {} ({} issue(s))",
                            "⚠".yellow(),
                            source.path.display(),
                            compiled.diagnostics().len()
                        );
                        for diagnostic in compiled.diagnostics() {
                            println!("  {}", format_diagnostic(&source, diagnostic));
                        }
                    }
                }
                OutputFormat::Json => reports.push(json!({
                    "template": source.id(),
                    "fingerprint": compiled.fingerprint(),
                    "well_formed": compiled.is_well_formed(),
                    "diagnostics": compiled.diagnostics(),
                })),
            }
        }

        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }

        enforce_strict(self.strict || config.strict, total)
    }
}
