//! Pre-fork supervisor
//!
//! The parent process: binds nothing itself (the listener arrives from
//! startup), forks the fixed worker pool, reaps and restarts exited
//! workers, and enforces the hard per-request timeout by killing any
//! worker whose oldest in-flight request has outlived it. The supervisor
//! never serves requests.

pub mod slot;
pub mod watchdog;

#[cfg(unix)]
mod arbiter;

#[cfg(unix)]
pub use arbiter::{ServePlan, Supervisor};
