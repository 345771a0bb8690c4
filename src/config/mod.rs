//! Launcher configuration
//!
//! Static configuration loaded once at startup from a TOML file with
//! environment variable overrides. Covers the serve policy (workers,
//! threads, timeout), the image build inputs, credential wiring, the
//! run-as identity, and logging.

mod r#impl;
mod structs;
mod validators;

pub use structs::{
    AppSection, BuildConfig, CredentialsConfig, IdentityConfig, LoggingConfig, ServerConfig,
    StaticConfig,
};

use std::sync::OnceLock;

static CONFIG: OnceLock<StaticConfig> = OnceLock::new();

/// Install the loaded configuration as the process-wide instance.
///
/// Later calls are ignored; the configuration is immutable after startup.
pub fn set_config(config: StaticConfig) {
    let _ = CONFIG.set(config);
}

/// Get the process-wide configuration, falling back to defaults when
/// `set_config` has not run (tests, library embedding).
pub fn get_config() -> &'static StaticConfig {
    CONFIG.get_or_init(StaticConfig::default)
}
