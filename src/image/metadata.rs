use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ForkliftError, Result};

pub const IMAGE_METADATA_FILE: &str = "image.json";

/// Launch policy recorded by the build, read back by serve
///
/// The serve phase never re-derives policy from live configuration: what
/// was baked is what runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageManifest {
    /// Entry point reference, `module:attribute`
    pub entry: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub threads: usize,
    /// Hard per-request timeout in seconds
    pub timeout: u64,
    /// Credential artifact path relative to the runtime root, when baked
    pub credential_file: Option<String>,
    pub credential_env_var: String,
    /// Unprivileged account the server runs under
    pub run_as: String,
    pub built_at: DateTime<Utc>,
    /// Rendered dependency pins, for inspection
    pub pins: Vec<String>,
}

impl ImageManifest {
    /// Write metadata into the runtime root
    pub fn write<P: AsRef<Path>>(&self, runtime_root: P) -> Result<()> {
        let path = runtime_root.as_ref().join(IMAGE_METADATA_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|e| {
            ForkliftError::build(format!(
                "cannot write image metadata {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load metadata from a runtime root; missing or malformed metadata
    /// means the root is not a runnable image.
    pub fn load<P: AsRef<Path>>(runtime_root: P) -> Result<Self> {
        let path = runtime_root.as_ref().join(IMAGE_METADATA_FILE);
        let content = fs::read_to_string(&path).map_err(|e| {
            ForkliftError::build(format!(
                "runtime root {} has no readable image metadata ({}); run `forklift build` first",
                runtime_root.as_ref().display(),
                e
            ))
        })?;
        let manifest: ImageManifest = serde_json::from_str(&content).map_err(|e| {
            ForkliftError::build(format!(
                "image metadata {} is malformed: {}",
                path.display(),
                e
            ))
        })?;
        Ok(manifest)
    }

    /// Absolute path of the baked credential artifact, when present
    pub fn credential_path<P: AsRef<Path>>(&self, runtime_root: P) -> Option<PathBuf> {
        self.credential_file
            .as_ref()
            .map(|rel| runtime_root.as_ref().join(rel))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
