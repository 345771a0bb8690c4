//! CLI interface layer
//!
//! Executes parsed commands. `serve` never reaches this layer; the mode
//! router starts the server directly.

pub mod process_manager;

use std::fmt;

use colored::Colorize;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::image::ImageBuilder;

pub use process_manager::ProcessManager;

#[derive(Debug)]
pub enum CliError {
    BuildError(String),
    ProcessError(String),
    CommandError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::BuildError(msg) => write!(f, "Build error: {}", msg),
            CliError::ProcessError(msg) => write!(f, "Process error: {}", msg),
            CliError::CommandError(msg) => write!(f, "Command error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::ForkliftError> for CliError {
    fn from(err: crate::errors::ForkliftError) -> Self {
        CliError::CommandError(err.format_simple())
    }
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    match cmd {
        Commands::Build => run_build(config),
        Commands::Status => ProcessManager::status(),
        Commands::Stop => ProcessManager::stop_server(),
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode router".to_string(),
        )),
    }
}

fn run_build(config: &StaticConfig) -> Result<(), CliError> {
    println!("{} Building runtime image...", "ℹ".bold().blue());

    let report = ImageBuilder::new(config)
        .build()
        .map_err(|e| CliError::BuildError(e.format_simple()))?;

    println!(
        "{} Image assembled at {}",
        "✓".bold().green(),
        report.runtime_root.display().to_string().cyan()
    );
    println!(
        "{} {} dependency pin(s), credentialed: {}",
        "ℹ".bold().blue(),
        report.pin_count,
        report.credentialed
    );
    Ok(())
}
