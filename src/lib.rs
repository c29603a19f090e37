//! docgen - business document template compiler and renderer
//!
//! Documents such as invoices and shipment notices are written as plain markup
//! with a small directive syntax:
//!
//! - `{name}` or `{a.b.c}` interpolates a value from the data
//! - `{#name}...{#end}` is a section: a loop over a sequence, a block scoped to
//!   a mapping, a conditional on any other value, or nothing when the value is
//!   absent or falsy
//!
//! Templates are treated as forgiving text. An `{#end}` with nothing open is
//! kept as literal text, and sections left open are closed at the end. Both
//! repairs are reported as diagnostics, as are variables that did not resolve.
//! Rendering never fails.
//!
//! # Modules
//!
//! - [`templating`] - scanner, normalizer, tree, resolver, renderer, and the
//!   compiled-template cache
//! - [`context`] - loading JSON, TOML and YAML data files into a render context
//! - [`config`] - the `~/.docgen/config.toml` settings
//! - [`core`] - error types and user-facing error reporting
//! - [`cli`] - the `docgen` command-line interface
//!
//! # Example
//!
//! ```
//! use docgen_cli::templating::compile;
//! use serde_json::json;
//!
//! let template = compile("Dear {customer.name},\n{#items}- {sku}\n{#end}").unwrap();
//! let outcome = template.render(&json!({
//!     "customer": {"name": "ACME"},
//!     "items": [{"sku": "A-1"}, {"sku": "B-2"}]
//! }));
//! assert_eq!(outcome.output, "Dear ACME,\n- A-1\n- B-2\n");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
