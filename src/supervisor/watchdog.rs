//! Heartbeat inspection
//!
//! The supervisor side of the in-flight protocol: read a worker's
//! heartbeat file and decide whether its oldest in-flight request has
//! outlived the hard timeout. An absent, empty or unreadable heartbeat is
//! treated as healthy; the watchdog only kills on positive evidence.

use std::fs;
use std::path::Path;

use tracing::warn;

/// Oldest in-flight start epoch recorded by the worker, if any
pub fn read_heartbeat(path: &Path) -> Option<u64> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u64>() {
        Ok(epoch) => Some(epoch),
        Err(_) => {
            warn!("heartbeat {} is corrupt, treating worker as healthy", path.display());
            None
        }
    }
}

/// Timeout check: strictly older than the allowed window
pub fn is_stale(oldest_epoch: u64, now_epoch: u64, timeout_secs: u64) -> bool {
    now_epoch.saturating_sub(oldest_epoch) > timeout_secs
}
