//! Test utilities for docgen
//!
//! Shared by unit tests and, through the `test-utils` feature, the
//! integration suite:
//! - [`init_test_logging`] to see `tracing` output while debugging a test
//! - [`fixtures`] with sample templates and data files
//!
//! # Example
//!
//! ```rust,no_run
//! use docgen_cli::test_utils::{TemplateFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let dir = tempfile::TempDir::new().unwrap();
//! let template = TemplateFixture::invoice().write_to(dir.path()).unwrap();
//! assert!(template.exists());
//! ```

pub mod fixtures;

pub use fixtures::{ContextFixture, TemplateFixture, invoice_context};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize tracing for tests.
///
/// With `Some(level)` that level is used. With `None`, logging is enabled only
/// when `RUST_LOG` is set:
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
