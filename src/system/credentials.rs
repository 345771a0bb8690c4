//! Credential environment wiring
//!
//! The credential artifact is communicated to downstream client libraries
//! through a single well-known environment variable holding its absolute
//! path. The variable is set once, before the supervisor forks its first
//! worker, and never mutated afterwards; workers inherit it.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{ForkliftError, Result};

/// Verify the artifact and export its absolute path.
///
/// Must run before any worker is forked and before any thread is spawned;
/// mutating the environment later would race readers.
pub fn wire_credentials(env_var: &str, artifact: &Path) -> Result<PathBuf> {
    let absolute = artifact.canonicalize().map_err(|e| {
        ForkliftError::credential(format!(
            "credential artifact {} is not accessible: {}",
            artifact.display(),
            e
        ))
    })?;

    // Readability check up front; a baked artifact the run-as account
    // cannot open would otherwise only surface on the first outbound call
    File::open(&absolute).map_err(|e| {
        ForkliftError::credential(format!(
            "credential artifact {} is not readable: {}",
            absolute.display(),
            e
        ))
    })?;

    // SAFETY: single-threaded startup path, before any fork or spawn
    unsafe {
        env::set_var(env_var, &absolute);
    }
    info!("{} = {}", env_var, absolute.display());

    Ok(absolute)
}
