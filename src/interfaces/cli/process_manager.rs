use colored::Colorize;

use super::CliError;
use crate::system::lockfile::{read_server_pid, PID_FILE};

pub struct ProcessManager;

impl ProcessManager {
    /// Report whether a supervisor is running from this directory
    pub fn status() -> Result<(), CliError> {
        #[cfg(unix)]
        {
            use nix::sys::signal;
            use nix::unistd::Pid;

            match read_server_pid() {
                Some(pid) => {
                    if signal::kill(Pid::from_raw(pid as i32), None).is_ok() {
                        println!(
                            "{} Supervisor running (PID: {})",
                            "✓".bold().green(),
                            pid
                        );
                    } else {
                        println!(
                            "{} Stale PID file ({}), supervisor not running",
                            "⚠".bold().yellow(),
                            PID_FILE
                        );
                    }
                }
                None => {
                    println!("{} Supervisor not running", "ℹ".bold().blue());
                }
            }
            Ok(())
        }

        #[cfg(not(unix))]
        {
            Err(CliError::ProcessError(
                "status requires a unix platform".to_string(),
            ))
        }
    }

    /// Stop a running supervisor: TERM, wait, then force KILL
    pub fn stop_server() -> Result<(), CliError> {
        println!("{} Stopping forklift supervisor...", "ℹ".bold().blue());

        #[cfg(unix)]
        {
            use std::fs;

            use nix::sys::signal::{self, Signal};
            use nix::unistd::Pid;

            let Some(pid) = read_server_pid() else {
                println!(
                    "{} PID file not found, supervisor may not be running",
                    "⚠".bold().yellow()
                );
                return Ok(());
            };

            let server_pid = Pid::from_raw(pid as i32);

            if signal::kill(server_pid, None).is_err() {
                println!(
                    "{} Process {} not found, cleaning PID file",
                    "⚠".bold().yellow(),
                    pid
                );
                let _ = fs::remove_file(PID_FILE);
                return Ok(());
            }

            match signal::kill(server_pid, Signal::SIGTERM) {
                Ok(_) => {
                    println!(
                        "{} Sent stop signal to supervisor process {}",
                        "✓".bold().green(),
                        pid
                    );

                    std::thread::sleep(std::time::Duration::from_secs(2));

                    if signal::kill(server_pid, None).is_ok() {
                        println!(
                            "{} Supervisor still running, trying to force kill...",
                            "⚠".bold().yellow()
                        );
                        match signal::kill(server_pid, Signal::SIGKILL) {
                            Ok(_) => {
                                println!("{} Supervisor force stopped", "✓".bold().green())
                            }
                            Err(e) => {
                                return Err(CliError::ProcessError(format!(
                                    "Failed to force stop supervisor: {}",
                                    e
                                )));
                            }
                        }
                    } else {
                        println!("{} Supervisor stopped gracefully", "✓".bold().green());
                    }

                    let _ = fs::remove_file(PID_FILE);
                    Ok(())
                }
                Err(e) => Err(CliError::ProcessError(format!(
                    "Failed to stop supervisor process: {}",
                    e
                ))),
            }
        }

        #[cfg(not(unix))]
        {
            Err(CliError::ProcessError(
                "stop requires a unix platform".to_string(),
            ))
        }
    }
}
