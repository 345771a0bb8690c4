use tracing::warn;

use crate::errors::{ForkliftError, Result};

use super::StaticConfig;

impl StaticConfig {
    /// Validate the loaded configuration before anything forks or binds.
    ///
    /// Zero-sized pools and a zero timeout are rejected outright; a worker
    /// count far beyond the machine is only warned about, matching the
    /// fixed-policy contract (the pool never scales on its own).
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            return Err(ForkliftError::config(
                "server.workers must be at least 1",
            ));
        }
        if self.server.threads == 0 {
            return Err(ForkliftError::config(
                "server.threads must be at least 1",
            ));
        }
        if self.server.timeout == 0 {
            return Err(ForkliftError::config(
                "server.timeout must be at least 1 second",
            ));
        }
        if self.app.entry.trim().is_empty() {
            return Err(ForkliftError::config("app.entry must not be empty"));
        }
        if self.identity.user.trim().is_empty() {
            return Err(ForkliftError::config("identity.user must not be empty"));
        }
        if self.build.runtime_root.trim().is_empty() {
            return Err(ForkliftError::config(
                "build.runtime_root must not be empty",
            ));
        }
        if let Some(file) = &self.credentials.file {
            if file.trim().is_empty() {
                return Err(ForkliftError::config(
                    "credentials.file must not be empty when set",
                ));
            }
            if self.credentials.env_var.trim().is_empty() {
                return Err(ForkliftError::config(
                    "credentials.env_var must not be empty",
                ));
            }
        }

        let cpu_bound = num_cpus::get() * 2;
        if self.server.workers > cpu_bound {
            warn!(
                "server.workers = {} exceeds twice the CPU count ({}); the pool is fixed-size and will not shrink",
                self.server.workers,
                num_cpus::get()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::StaticConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(StaticConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let mut config = StaticConfig::default();
        config.server.workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("workers"));
    }

    #[test]
    fn zero_threads_rejected() {
        let mut config = StaticConfig::default();
        config.server.threads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = StaticConfig::default();
        config.server.timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_entry_rejected() {
        let mut config = StaticConfig::default();
        config.app.entry = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_credential_path_rejected_when_set() {
        let mut config = StaticConfig::default();
        config.credentials.file = Some(String::new());
        assert!(config.validate().is_err());
    }
}
