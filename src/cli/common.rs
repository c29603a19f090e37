//! Helpers shared by the CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::Config;
use crate::core::DocgenError;
use crate::templating::diagnostics::{LineIndex, suggest};
use crate::templating::normalizer::MAX_SECTION_DEPTH;
use crate::templating::scanner::SECTION_CLOSE;
use crate::templating::{Diagnostic, DiagnosticKind};

/// Output format for commands that print results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text; diagnostics go to stderr
    #[default]
    Text,
    /// A single JSON document on stdout
    Json,
}

/// A template read from disk.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub path: PathBuf,
    pub raw: String,
    lines: LineIndex,
}

impl TemplateSource {
    pub fn new(path: PathBuf, raw: String) -> Self {
        let lines = LineIndex::new(&raw);
        Self {
            path,
            raw,
            lines,
        }
    }

    /// 1-based line and column of a diagnostic in this template.
    pub fn line_col(&self, diagnostic: &Diagnostic) -> (usize, usize) {
        self.lines.line_col(&self.raw, diagnostic.position)
    }

    /// Identifier used as the cache key and in messages.
    pub fn id(&self) -> String {
        self.path.display().to_string()
    }
}

/// Read a template, resolving relative paths against `templates_dir` and
/// enforcing `max_template_size` before the content is loaded.
pub async fn read_template(path: &Path, config: &Config) -> Result<TemplateSource> {
    let path = config.template_path(path);

    let metadata = match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => {
            return Err(DocgenError::TemplateNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
    };

    if metadata.len() > config.max_template_size {
        return Err(DocgenError::TemplateTooLarge {
            path: path.display().to_string(),
            size: metadata.len(),
            limit: config.max_template_size,
        }
        .into());
    }

    let bytes = fs::read(&path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    let raw = String::from_utf8(bytes).map_err(|_| DocgenError::TemplateNotUtf8 {
        path: path.display().to_string(),
    })?;

    tracing::debug!("Read template {} ({} bytes)", path.display(), raw.len());
    Ok(TemplateSource::new(path, raw))
}

/// Print diagnostics to stderr as `file:line:col: kind: message`.
///
/// When a context is given, missing variables get "did you mean" hints.
pub fn print_diagnostics(
    source: &TemplateSource,
    diagnostics: &[Diagnostic],
    context: Option<&Value>,
) {
    for diagnostic in diagnostics {
        eprintln!("{}", format_diagnostic(source, diagnostic));

        if diagnostic.kind != DiagnosticKind::MissingVariable {
            continue;
        }
        if let Some(context) = context {
            let suggestions = suggest(&diagnostic.path, context);
            if !suggestions.is_empty() {
                eprintln!("  {} did you mean: {}", "=".blue(), suggestions.join(", "));
            }
        }
    }
}

/// One-line description of a diagnostic, with its 1-based line and column.
pub fn format_diagnostic(source: &TemplateSource, diagnostic: &Diagnostic) -> String {
    let (line, column) = source.line_col(diagnostic);
    let label = "warning".yellow().bold();
    let message = match diagnostic.kind {
        DiagnosticKind::MissingVariable => format!("missing variable '{}'", diagnostic.path),
        DiagnosticKind::UnbalancedTag if diagnostic.path == SECTION_CLOSE => {
            format!("'{}' without an open section, kept as text", diagnostic.path)
        }
        DiagnosticKind::UnbalancedTag if diagnostic.path.starts_with("{#") => {
            format!(
                "'{}' nested more than {} sections deep, kept as text",
                diagnostic.path, MAX_SECTION_DEPTH
            )
        }
        DiagnosticKind::UnbalancedTag => {
            format!("section '{}' is never closed, closed at end of template", diagnostic.path)
        }
    };
    format!("{}:{}:{}: {}: {}", source.path.display(), line, column, label, message)
}

/// Fail with [`DocgenError::StrictViolation`] when strict and anything was reported.
pub fn enforce_strict(strict: bool, count: usize) -> Result<()> {
    if strict && count > 0 {
        return Err(DocgenError::StrictViolation {
            count,
        }
        .into());
    }
    Ok(())
}
