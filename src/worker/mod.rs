//! Worker process
//!
//! A worker is one forked child of the supervisor. It resolves the entry
//! point exactly once, then serves requests from the inherited listener
//! with a fixed number of threads until it exits or the supervisor kills
//! it. Workers never supervise and never fork.

pub mod heartbeat;
pub mod middleware;

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use tracing::{error, info};

use crate::app::{self, EntryPoint};

pub use heartbeat::InFlightTracker;
pub use middleware::Watchdog;

/// Normal exit (graceful stop)
pub const EXIT_OK: i32 = 0;
/// Entry point resolution failed; restarting will not help
pub const EXIT_ENTRY_POINT: i32 = 3;
/// The HTTP server failed while serving
pub const EXIT_SERVE: i32 = 4;

/// Per-worker launch parameters, fixed for the worker's lifetime
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub slot: usize,
    pub entry: EntryPoint,
    pub threads: usize,
    pub heartbeat_path: PathBuf,
}

/// Worker main. Runs inside the forked child; the return value becomes the
/// process exit code the supervisor observes.
pub fn run_worker(listener: TcpListener, settings: WorkerSettings) -> i32 {
    let factory = match app::resolve(&settings.entry) {
        Ok(factory) => factory,
        Err(e) => {
            // Resolution failure must be loud; the supervisor's boot-loop
            // guard turns repeated occurrences into a full abort
            error!("worker {}: {}", settings.slot, e.format_simple());
            return EXIT_ENTRY_POINT;
        }
    };

    let tracker = Arc::new(InFlightTracker::new(&settings.heartbeat_path));
    info!(
        "worker {} serving '{}' with {} thread(s)",
        settings.slot, settings.entry, settings.threads
    );

    let threads = settings.threads;
    let slot = settings.slot;

    let system = actix_web::rt::System::new();
    let served = system.block_on(async move {
        HttpServer::new(move || {
            let factory = factory.clone();
            let tracker = tracker.clone();
            App::new()
                .wrap(Watchdog::new(tracker))
                .configure(move |cfg| factory(cfg))
        })
        .listen(listener)?
        .workers(threads)
        .run()
        .await
    });

    match served {
        Ok(()) => {
            info!("worker {} exiting normally", slot);
            EXIT_OK
        }
        Err(e) => {
            error!("worker {} server error: {}", slot, e);
            EXIT_SERVE
        }
    }
}
