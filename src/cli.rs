//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for forklift using clap's derive
//! macros.

use clap::{Parser, Subcommand};

/// Forklift - A pre-fork HTTP application launcher
#[derive(Parser)]
#[command(name = "forklift")]
#[command(version)]
#[command(about = "A pre-fork HTTP application launcher", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: forklift.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the runtime image (dependencies, source, credentials)
    Build,

    /// Start the pre-fork server in the foreground (default)
    Serve,

    /// Show whether a supervisor is running from this directory
    Status,

    /// Stop a running supervisor
    Stop,
}
