use std::fmt;

#[derive(Debug, Clone)]
pub enum ForkliftError {
    Config(String),
    Manifest(String),
    Build(String),
    Credential(String),
    EntryPoint(String),
    Privilege(String),
    SignalOperation(String),
    FileOperation(String),
    WorkerLifecycle(String),
    Serialization(String),
}

impl ForkliftError {
    /// Stable error code, used in logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            ForkliftError::Config(_) => "E001",
            ForkliftError::Manifest(_) => "E002",
            ForkliftError::Build(_) => "E003",
            ForkliftError::Credential(_) => "E004",
            ForkliftError::EntryPoint(_) => "E005",
            ForkliftError::Privilege(_) => "E006",
            ForkliftError::SignalOperation(_) => "E007",
            ForkliftError::FileOperation(_) => "E008",
            ForkliftError::WorkerLifecycle(_) => "E009",
            ForkliftError::Serialization(_) => "E010",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ForkliftError::Config(_) => "Configuration Error",
            ForkliftError::Manifest(_) => "Dependency Manifest Error",
            ForkliftError::Build(_) => "Image Build Error",
            ForkliftError::Credential(_) => "Credential Artifact Error",
            ForkliftError::EntryPoint(_) => "Entry Point Error",
            ForkliftError::Privilege(_) => "Privilege Drop Error",
            ForkliftError::SignalOperation(_) => "Signal Operation Error",
            ForkliftError::FileOperation(_) => "File Operation Error",
            ForkliftError::WorkerLifecycle(_) => "Worker Lifecycle Error",
            ForkliftError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ForkliftError::Config(msg) => msg,
            ForkliftError::Manifest(msg) => msg,
            ForkliftError::Build(msg) => msg,
            ForkliftError::Credential(msg) => msg,
            ForkliftError::EntryPoint(msg) => msg,
            ForkliftError::Privilege(msg) => msg,
            ForkliftError::SignalOperation(msg) => msg,
            ForkliftError::FileOperation(msg) => msg,
            ForkliftError::WorkerLifecycle(msg) => msg,
            ForkliftError::Serialization(msg) => msg,
        }
    }

    /// Colored format for server-mode console output
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain format for CLI output and logs
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ForkliftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ForkliftError {}

// Convenience constructors
impl ForkliftError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Config(msg.into())
    }

    pub fn manifest<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Manifest(msg.into())
    }

    pub fn build<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Build(msg.into())
    }

    pub fn credential<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Credential(msg.into())
    }

    pub fn entry_point<T: Into<String>>(msg: T) -> Self {
        ForkliftError::EntryPoint(msg.into())
    }

    pub fn privilege<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Privilege(msg.into())
    }

    pub fn signal_operation<T: Into<String>>(msg: T) -> Self {
        ForkliftError::SignalOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ForkliftError::FileOperation(msg.into())
    }

    pub fn worker_lifecycle<T: Into<String>>(msg: T) -> Self {
        ForkliftError::WorkerLifecycle(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ForkliftError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for ForkliftError {
    fn from(err: std::io::Error) -> Self {
        ForkliftError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ForkliftError {
    fn from(err: serde_json::Error) -> Self {
        ForkliftError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ForkliftError {
    fn from(err: toml::de::Error) -> Self {
        ForkliftError::Config(err.to_string())
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for ForkliftError {
    fn from(err: nix::errno::Errno) -> Self {
        ForkliftError::SignalOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForkliftError>;
