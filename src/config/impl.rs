use std::env;
use std::path::Path;

use tracing::{error, warn};

use super::StaticConfig;

impl StaticConfig {
    /// Load configuration with priority: ENV > TOML file > defaults
    ///
    /// Prefixed variables use `FORKLIFT` with `__` as separator
    /// (`FORKLIFT__SERVER__PORT=9999`); the plain-named variables the
    /// deployment surface documents (`SERVER_PORT`, `WORKER_COUNT`, ...)
    /// are applied on top.
    pub fn load(path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(path);
        config.override_with_env();
        config
    }

    fn load_from_file(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("forklift.toml");

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FORKLIFT")
                    .separator("__")
                    .try_parsing(true),
            );

        // Logging is not initialized yet when this runs (the logging setup
        // itself needs the config), so failures go to stderr directly
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// Apply the plain-named environment variables
    fn override_with_env(&mut self) {
        // Server config
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            } else {
                error!("Invalid SERVER_PORT: {}", port);
            }
        }
        if let Ok(workers) = env::var("WORKER_COUNT") {
            if let Ok(count) = workers.parse() {
                self.server.workers = count;
            } else {
                error!("Invalid WORKER_COUNT: {}", workers);
            }
        }
        if let Ok(threads) = env::var("WORKER_THREADS") {
            if let Ok(count) = threads.parse() {
                self.server.threads = count;
            } else {
                error!("Invalid WORKER_THREADS: {}", threads);
            }
        }
        if let Ok(timeout) = env::var("REQUEST_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.server.timeout = secs;
            } else {
                error!("Invalid REQUEST_TIMEOUT: {}", timeout);
            }
        }

        // App config
        if let Ok(entry) = env::var("APP_ENTRY") {
            self.app.entry = entry;
        }
        if let Ok(source_dir) = env::var("APP_SOURCE_DIR") {
            self.app.source_dir = source_dir;
        }

        // Build config
        if let Ok(manifest) = env::var("DEPENDENCY_MANIFEST") {
            self.build.manifest = manifest;
        }
        if let Ok(installer) = env::var("PACKAGE_INSTALLER") {
            self.build.installer = installer;
        }
        if let Ok(runtime_root) = env::var("RUNTIME_ROOT") {
            self.build.runtime_root = runtime_root;
        }

        // Credentials config
        if let Ok(file) = env::var("CREDENTIALS_FILE") {
            if file.is_empty() {
                self.credentials.file = None;
            } else {
                self.credentials.file = Some(file);
            }
        }
        if let Ok(env_var) = env::var("CREDENTIALS_ENV_VAR") {
            self.credentials.env_var = env_var;
        }

        // Identity config
        if let Ok(user) = env::var("RUN_AS_USER") {
            self.identity.user = user;
        }

        // Logging config
        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            if format == "text" || format == "json" {
                self.logging.format = format;
            } else {
                warn!("Invalid LOG_FORMAT '{}', keeping '{}'", format, self.logging.format);
            }
        }
    }
}
