//! Shared constants.

/// Default maximum template size in bytes (1 MiB).
///
/// Larger templates are rejected before compiling. Override with
/// `max_template_size` in the configuration file.
pub const DEFAULT_MAX_TEMPLATE_SIZE: u64 = 1024 * 1024;

/// Default CPU core count when detection fails.
///
/// Used as a fallback when `std::thread::available_parallelism()` returns an error.
pub const FALLBACK_CORE_COUNT: usize = 4;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "DOCGEN_CONFIG";

/// Directory under the home directory holding the default configuration.
pub const CONFIG_DIR_NAME: &str = ".docgen";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Extension given to rendered files written by `docgen batch`.
pub const BATCH_OUTPUT_EXTENSION: &str = "out";
