//! Application lifecycle and execution modes
//!
//! `lifetime` prepares the serve phase (image metadata, credentials,
//! privileges, listener); `modes` routes between server and CLI execution.

pub mod lifetime;
pub mod modes;
