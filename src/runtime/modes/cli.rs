//! CLI mode
//!
//! Routes a parsed command to the CLI interface layer and converts the
//! outcome into a process exit code.

use std::process::ExitCode;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::run_cli_command;

pub fn run_cli(command: Commands, config: &StaticConfig) -> ExitCode {
    match run_cli_command(command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            use colored::Colorize;
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
