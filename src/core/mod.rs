//! Core types shared across docgen.
//!
//! Currently this is the application error type and the user-facing error
//! reporting built on it:
//! - [`DocgenError`] - enumerated failure cases
//! - [`ErrorContext`] - error plus details and a suggestion, printed in colour
//! - [`user_friendly_error`] - turn any [`anyhow::Error`] into an [`ErrorContext`]

pub mod error;

pub use error::{DocgenError, ErrorContext, user_friendly_error};
