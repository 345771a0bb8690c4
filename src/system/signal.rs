//! Supervisor signal handling
//!
//! The supervisor owns no async runtime, so shutdown signals are latched
//! into an atomic flag from a plain sigaction handler and polled by the
//! supervise loop.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::errors::Result;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_shutdown(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// Install SIGTERM/SIGINT handlers that latch the shutdown flag.
///
/// Handlers are installed without SA_RESTART so a pending sleep in the
/// supervise loop is interrupted promptly.
pub fn install_shutdown_handlers() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_shutdown),
        SaFlags::empty(),
        SigSet::empty(),
    );
    unsafe {
        signal::sigaction(Signal::SIGTERM, &action)?;
        signal::sigaction(Signal::SIGINT, &action)?;
    }
    Ok(())
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

/// Test hook: clear a latched flag
#[doc(hidden)]
pub fn reset_shutdown_flag() {
    SHUTDOWN.store(false, Ordering::SeqCst);
}
