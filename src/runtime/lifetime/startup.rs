//! Serve-phase startup
//!
//! Everything that must happen in the parent before the first fork, in
//! order: load the image metadata, wire the credential environment, drop
//! privileges, take the PID lock, bind the listener. Each step is fatal on
//! failure; there is no degraded startup.

use std::net::TcpListener;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::StaticConfig;
use crate::errors::{ForkliftError, Result};
use crate::image::ImageManifest;
use crate::system;

pub struct ServeContext {
    pub image: ImageManifest,
    pub listener: TcpListener,
    pub runtime_root: PathBuf,
}

/// Prepare the supervisor's context
pub fn prepare_serve_startup(config: &StaticConfig) -> Result<ServeContext> {
    let runtime_root = PathBuf::from(&config.build.runtime_root);
    let image = ImageManifest::load(&runtime_root)?;
    info!(
        "image built {} serving '{}'",
        image.built_at.to_rfc3339(),
        image.entry
    );

    // Environment wiring happens while the process is still single
    // threaded; workers inherit the variable
    match image.credential_path(&runtime_root) {
        Some(artifact) => {
            system::credentials::wire_credentials(&image.credential_env_var, &artifact)?;
        }
        None => {
            warn!("uncredentialed image, no credential environment wiring");
        }
    }

    // The heartbeat directory must exist before ownership is handed over,
    // so the unprivileged supervisor and workers can write into it
    std::fs::create_dir_all(runtime_root.join("heartbeat")).map_err(|e| {
        ForkliftError::worker_lifecycle(format!(
            "cannot create heartbeat directory under {}: {}",
            runtime_root.display(),
            e
        ))
    })?;

    #[cfg(unix)]
    system::privilege::drop_privileges(&image.run_as, Some(runtime_root.as_path()))?;

    system::lockfile::init_lockfile()?;

    let bind_address = image.bind_address();
    let listener = TcpListener::bind(&bind_address).map_err(|e| {
        system::lockfile::cleanup_lockfile();
        ForkliftError::worker_lifecycle(format!("cannot bind {}: {}", bind_address, e))
    })?;
    info!("listening at http://{}", bind_address);

    Ok(ServeContext {
        image,
        listener,
        runtime_root,
    })
}
