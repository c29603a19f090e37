//! Error handling for docgen
//!
//! The error system has two layers:
//! - [`DocgenError`] - enumerated failure cases for the command-line tool
//! - [`ErrorContext`] - wrapper adding user-facing details and a suggestion
//!
//! Template problems that are not failures (missing variables, repaired
//! nesting) never show up here. They travel as
//! [`Diagnostic`](crate::templating::Diagnostic)s next to the rendered output;
//! only strict mode turns them into [`DocgenError::StrictViolation`].
//!
//! Common library errors convert automatically:
//! - [`std::io::Error`] → [`DocgenError::IoError`]
//! - [`serde_json::Error`] → [`DocgenError::JsonError`]
//! - [`toml::de::Error`] → [`DocgenError::TomlError`]
//! - [`serde_yaml::Error`] → [`DocgenError::YamlError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use docgen_cli::core::{DocgenError, user_friendly_error};
//!
//! let error = anyhow::Error::from(DocgenError::TemplateNotFound {
//!     path: "invoice.txt".to_string(),
//! });
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::templating::TemplateError;

/// Failure cases of the command-line tool.
#[derive(Error, Debug)]
pub enum DocgenError {
    #[error("Template file not found: {path}")]
    TemplateNotFound {
        path: String,
    },

    #[error("Template {path} is {size} bytes, which exceeds the {limit} byte limit")]
    TemplateTooLarge {
        path: String,
        size: u64,
        limit: u64,
    },

    #[error("Template {path} is not valid UTF-8")]
    TemplateNotUtf8 {
        path: String,
    },

    #[error("Context file not found: {path}")]
    ContextNotFound {
        path: String,
    },

    #[error("Unsupported context file format '{extension}' for {path}")]
    UnsupportedContextFormat {
        path: String,
        extension: String,
    },

    #[error("Invalid context file {path}: {reason}")]
    InvalidContext {
        path: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    /// Strict mode and at least one diagnostic was reported.
    #[error("{count} diagnostic(s) reported in strict mode")]
    StrictViolation {
        count: usize,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// An error plus optional details and a suggested fix.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DocgenError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra explanation
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: DocgenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colours.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for printing.
///
/// Known error types get a tailored suggestion. Anything else keeps its
/// message together with the full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<DocgenError>() {
        Ok(docgen_error) => return create_error_context(docgen_error),
        Err(error) => error,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DocgenError::Other {
                    message: full_message(&error),
                })
                .with_suggestion("Check the file permissions and ownership")
                .with_details("docgen could not read or write one of the files involved");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DocgenError::Other {
                    message: full_message(&error),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(DocgenError::Other {
            message: full_message(&error),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and key names");
    }

    ErrorContext::new(DocgenError::Other {
        message: full_message(&error),
    })
}

/// The error message followed by its numbered cause chain.
fn full_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

fn create_error_context(error: DocgenError) -> ErrorContext {
    match &error {
        DocgenError::TemplateNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the template path, or set templates_dir in the config file for relative paths"),

        DocgenError::TemplateTooLarge { .. } => ErrorContext::new(error)
            .with_suggestion("Raise max_template_size in the config file if this template is expected to be this large")
            .with_details("Oversized templates are rejected before compiling to bound memory use"),

        DocgenError::TemplateNotUtf8 { .. } => ErrorContext::new(error)
            .with_suggestion("Re-save the template with UTF-8 encoding"),

        DocgenError::ContextNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Check the path passed to --data or --context"),

        DocgenError::UnsupportedContextFormat { .. } => ErrorContext::new(error)
            .with_suggestion("Use a .json, .toml, .yaml or .yml file"),

        DocgenError::InvalidContext { .. } | DocgenError::JsonError(_) | DocgenError::YamlError(_) => {
            ErrorContext::new(error)
                .with_suggestion("Fix the syntax of the data file; it must parse as JSON, TOML or YAML according to its extension")
        }

        DocgenError::TomlError(_) | DocgenError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the configuration file, or run 'docgen config show' to see the effective settings"),

        DocgenError::StrictViolation { .. } => ErrorContext::new(error)
            .with_suggestion("Fix the reported diagnostics, or run without --strict")
            .with_details("Strict mode treats missing variables and unbalanced tags as failures"),

        DocgenError::Template(_) => ErrorContext::new(error)
            .with_details("Malformed nesting is normally repaired automatically; this template could not be"),

        DocgenError::IoError(_) => ErrorContext::new(error)
            .with_suggestion("Check that the path exists and is accessible"),

        DocgenError::Other { .. } => ErrorContext::new(error),
    }
}
