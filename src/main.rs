use std::process::ExitCode;

use clap::Parser;

use forklift::cli::{Cli, Commands};
use forklift::config::{self, StaticConfig};
use forklift::runtime::modes;
use forklift::system::logging;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = StaticConfig::load(cli.config.as_deref());
    logging::init_logging(&config);

    if let Err(e) = config.validate() {
        eprintln!("{}", e.format_colored());
        return ExitCode::FAILURE;
    }
    config::set_config(config.clone());

    match cli.command {
        // Server mode is the default; it forks, so it owns the process
        None | Some(Commands::Serve) => match modes::server::run_server(&config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("server exited with error: {}", e);
                ExitCode::FAILURE
            }
        },
        Some(command) => run_command(command, &config),
    }
}

#[cfg(feature = "cli")]
fn run_command(command: Commands, config: &StaticConfig) -> ExitCode {
    modes::cli::run_cli(command, config)
}

#[cfg(not(feature = "cli"))]
fn run_command(_command: Commands, _config: &StaticConfig) -> ExitCode {
    eprintln!("CLI support is not compiled into this binary");
    ExitCode::FAILURE
}
