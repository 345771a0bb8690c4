//! Supervisor PID file
//!
//! One supervisor per working directory. Stale files left by killed
//! processes and container restarts are detected and cleaned rather than
//! treated as a running server.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, error, info};

pub const PID_FILE: &str = "forklift.pid";

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid;

    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Write the supervisor PID, refusing to start when another supervisor is
/// already running from this directory.
#[cfg(unix)]
pub fn init_lockfile() -> io::Result<()> {
    use std::process;

    if Path::new(PID_FILE).exists() {
        match fs::read_to_string(PID_FILE) {
            Ok(old_pid_str) => {
                if let Ok(old_pid) = old_pid_str.trim().parse::<u32>() {
                    let current_pid = process::id();

                    // Both PID 1 means a container restart left the file behind
                    if current_pid == 1 && old_pid == 1 {
                        info!("Container restart detected, removing old PID file");
                        let _ = fs::remove_file(PID_FILE);
                    } else if process_alive(old_pid) {
                        error!("Server already running (PID: {}), stop it first", old_pid);
                        return Err(io::Error::new(
                            io::ErrorKind::AlreadyExists,
                            format!("server already running with PID {}", old_pid),
                        ));
                    } else {
                        info!("Stale PID file detected, cleaning up...");
                        let _ = fs::remove_file(PID_FILE);
                    }
                }
            }
            Err(_) => {
                // Corrupted PID file, remove it
                let _ = fs::remove_file(PID_FILE);
            }
        }
    }

    let pid = process::id();
    if let Err(e) = fs::write(PID_FILE, pid.to_string()) {
        error!("Failed to write PID file: {}", e);
        return Err(e);
    }
    debug!("Supervisor PID: {}", pid);

    Ok(())
}

#[cfg(not(unix))]
pub fn init_lockfile() -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "the pre-fork server requires a unix platform",
    ))
}

/// Remove the PID file on shutdown
pub fn cleanup_lockfile() {
    match fs::remove_file(PID_FILE) {
        Ok(()) => info!("PID file cleaned: {}", PID_FILE),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => error!("Failed to delete PID file: {}", e),
    }
}

/// Read the running supervisor's PID, if the file exists and parses
pub fn read_server_pid() -> Option<u32> {
    let content = fs::read_to_string(PID_FILE).ok()?;
    content.trim().parse().ok()
}
