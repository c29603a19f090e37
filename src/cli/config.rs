//! Manage the docgen configuration file.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Show or create the configuration file.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Configuration operation to perform
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Write a configuration file with default values.
    ///
    /// Refuses to overwrite an existing file unless `--force` is given.
    ///
    /// # Examples
    /// ```bash
    /// docgen config init
    /// docgen config init --force
    /// ```
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Display the effective configuration.
    Show,

    /// Print the configuration file location.
    Path,
}

impl ConfigCommand {
    /// Run the subcommand against `config_path`, or the default location.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let path = match config_path {
            Some(path) => path,
            None => Config::resolve_path()?,
        };

        match self.command {
            Some(ConfigSubcommands::Init {
                force,
            }) => Self::init(&path, force).await,
            Some(ConfigSubcommands::Show) | None => Self::show(&path).await,
            Some(ConfigSubcommands::Path) => {
                println!("{}", path.display());
                Ok(())
            }
        }
    }

    async fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            println!("❌ Config already exists at: {}", path.display());
            println!("   Use --force to overwrite");
            return Ok(());
        }

        let config = Config::default();
        config.save_to(path).await?;

        println!("✅ Created config at: {}", path.display());
        println!("\n{}", "Configuration:".bold());
        println!("{}", toml::to_string_pretty(&config)?);
        Ok(())
    }

    async fn show(path: &Path) -> Result<()> {
        let config = Config::load_with_optional(Some(path.to_path_buf())).await?;

        println!("{}", "Configuration".bold());
        println!("Location: {}", path.display());
        if !path.exists() {
            println!("(file not found, showing defaults)");
        }
        println!();
        println!("max_template_size = {}", config.max_template_size);
        println!("strict = {}", config.strict);
        println!("max_parallel = {}", config.parallelism());
        match &config.templates_dir {
            Some(dir) => println!("templates_dir = {}", dir.display()),
            None => println!("templates_dir = (current directory)"),
        }
        Ok(())
    }
}
