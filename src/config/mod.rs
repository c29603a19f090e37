//! Configuration for the `docgen` command-line tool.
//!
//! Settings live in a single TOML file. The file is located in this order:
//!
//! 1. the `--config <path>` flag
//! 2. the `DOCGEN_CONFIG` environment variable
//! 3. `~/.docgen/config.toml` (`%LOCALAPPDATA%\docgen\config.toml` on Windows)
//!
//! A missing file is not an error; built-in defaults apply.
//!
//! ```toml
//! # Reject templates larger than 2 MiB
//! max_template_size = 2097152
//!
//! # Exit non-zero when any diagnostic is reported
//! strict = true
//!
//! # Render at most 8 documents at once in `docgen batch`
//! max_parallel = 8
//!
//! # Resolve relative template paths against this directory
//! templates_dir = "/srv/docgen/templates"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_MAX_TEMPLATE_SIZE,
    FALLBACK_CORE_COUNT,
};

const fn default_max_template_size() -> u64 {
    DEFAULT_MAX_TEMPLATE_SIZE
}

fn is_default_max_template_size(size: &u64) -> bool {
    *size == default_max_template_size()
}

/// User configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Maximum template size in bytes.
    ///
    /// Default: 1 MiB (1,048,576 bytes)
    #[serde(
        default = "default_max_template_size",
        skip_serializing_if = "is_default_max_template_size"
    )]
    pub max_template_size: u64,

    /// Treat any diagnostic as a failure.
    #[serde(default)]
    pub strict: bool,

    /// Upper bound on concurrent renders in `docgen batch`.
    ///
    /// Defaults to the number of CPU cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,

    /// Base directory for relative template paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_template_size: default_max_template_size(),
            strict: false,
            max_parallel: None,
            templates_dir: None,
        }
    }
}

impl Config {
    /// Load configuration, honouring an explicit path first.
    ///
    /// Falls back to `DOCGEN_CONFIG`, then the default location. Returns the
    /// defaults when the selected file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::resolve_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration as pretty TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// The file [`Config::load_with_optional`] reads when no path is given.
    pub fn resolve_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Platform default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("docgen")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(CONFIG_DIR_NAME)
        };

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// Effective concurrency bound for batch rendering; never zero.
    pub fn parallelism(&self) -> usize {
        self.max_parallel
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(FALLBACK_CORE_COUNT)
            })
            .max(1)
    }

    /// Resolve a template path given on the command line.
    ///
    /// Relative paths are joined onto `templates_dir` when one is configured.
    pub fn template_path(&self, path: &Path) -> PathBuf {
        match &self.templates_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
