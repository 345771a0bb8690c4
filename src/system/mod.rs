//! System-level modules
//!
//! - Logging initialization
//! - PID-file management for the supervisor
//! - Credential environment wiring
//! - Privilege drop to the unprivileged run-as account (unix)
//! - Supervisor signal handling (unix)

pub mod credentials;
pub mod lockfile;
pub mod logging;
#[cfg(unix)]
pub mod privilege;
#[cfg(unix)]
pub mod signal;

pub use lockfile::{cleanup_lockfile, init_lockfile, read_server_pid};
