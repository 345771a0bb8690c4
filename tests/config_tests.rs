use forklift::config::StaticConfig;

#[cfg(test)]
mod toml_tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: StaticConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.workers, 2);
        assert_eq!(config.server.threads, 4);
        assert_eq!(config.server.timeout, 120);
        assert_eq!(config.app.entry, "builtin:health");
        assert_eq!(config.build.manifest, "requirements.txt");
        assert_eq!(config.identity.user, "appuser");
        assert!(config.credentials.file.is_none());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let content = "\
[server]
port = 8080
workers = 3

[credentials]
file = \"credentials.json\"
";
        let config: StaticConfig = toml::from_str(content).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.workers, 3);
        assert_eq!(config.server.threads, 4);
        assert_eq!(config.credentials.file.as_deref(), Some("credentials.json"));
        assert_eq!(config.credentials.env_var, "GOOGLE_APPLICATION_CREDENTIALS");
    }

    #[test]
    fn test_logging_section() {
        let content = "\
[logging]
level = \"debug\"
format = \"json\"
file = \"logs/forklift.log\"
enable_rotation = true
max_backups = 3
";
        let config: StaticConfig = toml::from_str(content).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.enable_rotation);
        assert_eq!(config.logging.max_backups, 3);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = StaticConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        let reparsed: StaticConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed.server.port, config.server.port);
        assert_eq!(reparsed.app.entry, config.app.entry);
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(StaticConfig::default().validate().is_ok());
    }

    #[test]
    fn test_pool_policy_must_be_positive() {
        for field in ["workers", "threads", "timeout"] {
            let content = format!("[server]\n{} = 0\n", field);
            let config: StaticConfig = toml::from_str(&content).unwrap();
            assert!(
                config.validate().is_err(),
                "server.{} = 0 should be rejected",
                field
            );
        }
    }
}

#[cfg(test)]
mod env_override_tests {
    use super::*;

    // Environment mutation is process-global; keep every env-dependent
    // assertion in this single test.
    #[test]
    fn test_plain_env_vars_override_file_values() {
        unsafe {
            std::env::set_var("SERVER_PORT", "9090");
            std::env::set_var("WORKER_COUNT", "6");
            std::env::set_var("REQUEST_TIMEOUT", "30");
            std::env::set_var("APP_ENTRY", "wsgi:app");
            std::env::set_var("RUN_AS_USER", "svc");
        }

        let config = StaticConfig::load(Some("no-such-forklift-config.toml"));
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.workers, 6);
        assert_eq!(config.server.timeout, 30);
        assert_eq!(config.app.entry, "wsgi:app");
        assert_eq!(config.identity.user, "svc");
        // Untouched values stay at defaults
        assert_eq!(config.server.threads, 4);

        unsafe {
            std::env::remove_var("SERVER_PORT");
            std::env::remove_var("WORKER_COUNT");
            std::env::remove_var("REQUEST_TIMEOUT");
            std::env::remove_var("APP_ENTRY");
            std::env::remove_var("RUN_AS_USER");
        }
    }
}
