//! List the variables and sections a template refers to.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::common::{OutputFormat, read_template};
use crate::config::Config;
use crate::context::load_context_file;
use crate::templating::compile;
use crate::templating::export::referenced;
use crate::templating::resolver::resolve;
use crate::templating::tree::VariablePath;

/// List referenced variable paths and section names.
///
/// With `--context`, the template is rendered against that file and each
/// name is marked as found or missing. A section counts as found when its
/// name resolves at the top level of the data.
///
/// # Examples
/// ```bash
/// docgen variables invoice.txt
/// docgen variables invoice.txt --context invoice.json --format json
/// ```
#[derive(Args, Debug)]
pub struct VariablesCommand {
    /// Template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Data file to check the names against
    #[arg(long, value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Entry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    found: Option<bool>,
}

#[derive(Debug, Serialize)]
struct Report {
    variables: Vec<Entry>,
    sections: Vec<Entry>,
}

impl VariablesCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let source = read_template(&self.template, config).await?;
        let compiled = compile(&source.raw)?;
        let refs = referenced(compiled.root());

        let report = match &self.context {
            None => Report {
                variables: refs.variables.into_iter().map(unchecked).collect(),
                sections: refs.sections.into_iter().map(unchecked).collect(),
            },
            Some(path) => {
                let context = load_context_file(path).await?;
                let outcome = compiled.render(&context);
                let missing: BTreeSet<&str> =
                    outcome.missing_variables().map(|d| d.path.as_str()).collect();

                Report {
                    variables: refs
                        .variables
                        .into_iter()
                        .map(|name| {
                            let found = !missing.contains(name.as_str());
                            Entry {
                                name,
                                found: Some(found),
                            }
                        })
                        .collect(),
                    sections: refs
                        .sections
                        .into_iter()
                        .map(|name| {
                            let path = VariablePath::parse(&name);
                            let found = resolve(path.segments(), &context).is_some();
                            Entry {
                                name,
                                found: Some(found),
                            }
                        })
                        .collect(),
                }
            }
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                print_entries("Variables", &report.variables);
                print_entries("Sections", &report.sections);
            }
        }
        Ok(())
    }
}

fn unchecked(name: String) -> Entry {
    Entry {
        name,
        found: None,
    }
}

fn print_entries(title: &str, entries: &[Entry]) {
    println!("{}:", title.bold());
    if entries.is_empty() {
        println!("  (none)");
    }
    for entry in entries {
        match entry.found {
            None => println!("  {}", entry.name),
            Some(true) => println!("  {} {}", "✓".green(), entry.name),
            Some(false) => println!("  {} {}", "✗".red(), entry.name),
        }
    }
}
