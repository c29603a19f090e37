//! docgen CLI entry point
//!
//! Parses arguments, runs the selected command, and prints failures as
//! user-friendly errors with suggestions. Commands:
//! - `render` - render one template
//! - `batch` - render one template against many data files
//! - `check` - report unbalanced sections
//! - `normalize` - print repaired template text
//! - `variables` - list referenced names
//! - `config` - manage the configuration file

use anyhow::Result;
use clap::Parser;
use docgen_cli::cli;
use docgen_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
