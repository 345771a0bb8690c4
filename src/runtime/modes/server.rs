//! Server mode
//!
//! Runs the serve phase: startup context, then the pre-fork supervisor in
//! the foreground until a shutdown signal or a fatal pool failure.

use anyhow::Result;
use tracing::error;

use crate::config::StaticConfig;

/// Run the pre-fork server
///
/// **Note**: Logging must be initialized before calling this function.
#[cfg(unix)]
pub fn run_server(config: &StaticConfig) -> Result<()> {
    use crate::app::EntryPoint;
    use crate::runtime::lifetime::startup;
    use crate::supervisor::{ServePlan, Supervisor};
    use crate::system::lockfile::cleanup_lockfile;

    let context = startup::prepare_serve_startup(config).map_err(|e| {
        error!("{}", e.format_colored());
        anyhow::anyhow!(e.format_simple())
    })?;

    let entry: EntryPoint = context.image.entry.parse().map_err(
        |e: crate::errors::ForkliftError| {
            cleanup_lockfile();
            error!("{}", e.format_colored());
            anyhow::anyhow!(e.format_simple())
        },
    )?;

    let plan = ServePlan {
        entry,
        workers: context.image.workers,
        threads: context.image.threads,
        timeout: context.image.timeout,
        heartbeat_dir: context.runtime_root.join("heartbeat"),
    };

    let outcome = Supervisor::new(context.listener, plan).run();
    cleanup_lockfile();

    outcome.map_err(|e| {
        error!("{}", e.format_colored());
        anyhow::anyhow!(e.format_simple())
    })
}

#[cfg(not(unix))]
pub fn run_server(_config: &StaticConfig) -> Result<()> {
    anyhow::bail!("the pre-fork server requires a unix platform")
}
