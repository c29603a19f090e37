//! Template compilation errors.
//!
//! Malformed nesting is always recovered (see the normalizer), so in practice
//! compilation never fails. The error type exists so the compile boundary has
//! a stable signature should a truly unrecoverable input ever be identified.

use thiserror::Error;

/// Errors returned by [`compile`](super::compile).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Input that cannot be turned into a well-formed tree.
    #[error("Template syntax anomaly at offset {position}: {message}")]
    SyntaxAnomaly {
        message: String,
        position: usize,
    },
}
