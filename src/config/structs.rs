use serde::{Deserialize, Serialize};

/// Static configuration (loaded from TOML at startup)
///
/// Sections:
/// - server: bind address and the worker/thread/timeout policy
/// - app: entry point reference and staged source tree
/// - build: dependency manifest, installer, runtime root
/// - credentials: optional service-account artifact and its env var
/// - identity: unprivileged run-as account
/// - logging: log level, output and format
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server process-model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Number of pre-forked worker processes
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Request-handling threads inside each worker
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Hard per-request timeout in seconds; exceeding it kills the worker
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Application contract configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    /// Entry point reference, `module:attribute`
    #[serde(default = "default_app_entry")]
    pub entry: String,
    /// Application source tree staged into the runtime root at build time
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
}

/// Image build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Dependency manifest, one `name==version` pin per line
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Package installer program invoked during the build
    #[serde(default = "default_installer")]
    pub installer: String,
    /// Directory the build assembles; serve refuses to start without it
    #[serde(default = "default_runtime_root")]
    pub runtime_root: String,
}

/// Credential artifact configuration
///
/// When `file` is unset the build is uncredentialed and no environment
/// wiring happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub file: Option<String>,
    /// Well-known variable downstream client libraries read
    #[serde(default = "default_credentials_env_var")]
    pub env_var: String,
}

/// Run-as identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Unprivileged account the server runs under
    #[serde(default = "default_run_as_user")]
    pub user: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file path; empty or unset means stdout
    #[serde(default)]
    pub file: Option<String>,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5001
}

fn default_workers() -> usize {
    2
}

fn default_threads() -> usize {
    4
}

fn default_timeout() -> u64 {
    120
}

fn default_app_entry() -> String {
    "builtin:health".to_string()
}

fn default_source_dir() -> String {
    "app".to_string()
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_installer() -> String {
    "pip".to_string()
}

fn default_runtime_root() -> String {
    "runtime".to_string()
}

fn default_credentials_env_var() -> String {
    "GOOGLE_APPLICATION_CREDENTIALS".to_string()
}

fn default_run_as_user() -> String {
    "appuser".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            workers: default_workers(),
            threads: default_threads(),
            timeout: default_timeout(),
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            entry: default_app_entry(),
            source_dir: default_source_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            installer: default_installer(),
            runtime_root: default_runtime_root(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            file: None,
            env_var: default_credentials_env_var(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user: default_run_as_user(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_launch_policy() {
        let config = StaticConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.workers, 2);
        assert_eq!(config.server.threads, 4);
        assert_eq!(config.server.timeout, 120);
    }

    #[test]
    fn credentials_default_to_uncredentialed() {
        let config = StaticConfig::default();
        assert!(config.credentials.file.is_none());
        assert_eq!(config.credentials.env_var, "GOOGLE_APPLICATION_CREDENTIALS");
    }

    #[test]
    fn toml_sections_are_optional() {
        let config: StaticConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.workers, 2);
        assert_eq!(config.identity.user, "appuser");
    }
}
