//! Command-line interface for docgen.
//!
//! # Commands
//!
//! - `render` - render one template against layered data files
//! - `batch` - render one template against many data files concurrently
//! - `check` - report unbalanced sections in templates
//! - `normalize` - print a template with its nesting repaired
//! - `variables` - list the names a template refers to
//! - `config` - show or create the configuration file
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - configuration file to use
//!
//! Without `-v` or `-q` the `RUST_LOG` environment variable decides the log
//! level, defaulting to warnings.

mod batch;
mod check;
pub mod common;
mod config;
mod normalize;
mod render;
mod variables;


use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Settings derived from global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter forced by `-v`/`-q`; `None` defers to `RUST_LOG`
    pub log_level: Option<String>,

    /// Configuration file given with `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber. Logs go to stderr.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Business document template renderer.
#[derive(Parser, Debug)]
#[command(
    name = "docgen",
    about = "Render business document templates with {name} and {#section}...{#end} directives",
    version,
    long_about = "docgen compiles templates written in a forgiving directive syntax and renders them \
                  against JSON, TOML or YAML data. Malformed nesting is repaired and reported, never fatal."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (default: $DOCGEN_CONFIG, then ~/.docgen/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template
    Render(render::RenderCommand),

    /// Render a template against many data files
    Batch(batch::BatchCommand),

    /// Check templates for unbalanced sections
    Check(check::CheckCommand),

    /// Print a template with repaired nesting
    Normalize(normalize::NormalizeCommand),

    /// List variables and sections used by a template
    Variables(variables::VariablesCommand),

    /// Manage the configuration file
    Config(config::ConfigCommand),
}

impl Cli {
    /// Build the configuration from global flags, set up logging, and run.
    pub async fn execute(self) -> Result<()> {
        let cli_config = self.build_config();
        cli_config.init_logging();
        self.execute_with_config(cli_config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, cli_config: CliConfig) -> Result<()> {
        let config_path = cli_config.config_path;

        match self.command {
            Commands::Config(cmd) => cmd.execute(config_path).await,
            Commands::Render(cmd) => cmd.execute(&load_config(config_path).await?).await,
            Commands::Batch(cmd) => cmd.execute(&load_config(config_path).await?).await,
            Commands::Check(cmd) => cmd.execute(&load_config(config_path).await?).await,
            Commands::Normalize(cmd) => cmd.execute(&load_config(config_path).await?).await,
            Commands::Variables(cmd) => cmd.execute(&load_config(config_path).await?).await,
        }
    }
}

async fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = Config::load_with_optional(path).await?;
    tracing::debug!("Using config: {:?}", config);
    Ok(config)
}
