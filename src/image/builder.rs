use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::errors::{ForkliftError, Result};
use crate::manifest::Manifest;

use super::metadata::ImageManifest;

/// Fixed relative path of the staged credential artifact inside the root
pub const CREDENTIAL_FILE_NAME: &str = "credentials.json";

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub runtime_root: PathBuf,
    pub pin_count: usize,
    pub credentialed: bool,
}

/// Assembles the runtime root
///
/// Build order: manifest parse, dependency install, source staging,
/// credential staging, metadata write. The first failure aborts the build
/// and removes whatever was assembled; no partial image is usable.
pub struct ImageBuilder {
    config: StaticConfig,
}

impl ImageBuilder {
    pub fn new(config: &StaticConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn build(&self) -> Result<BuildReport> {
        let root = PathBuf::from(&self.config.build.runtime_root);

        // Rebuilds start clean
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| {
                ForkliftError::build(format!(
                    "cannot clear previous runtime root {}: {}",
                    root.display(),
                    e
                ))
            })?;
        }

        match self.assemble(&root) {
            Ok(report) => Ok(report),
            Err(e) => {
                if root.exists() {
                    if let Err(cleanup) = fs::remove_dir_all(&root) {
                        warn!(
                            "failed to remove partial runtime root {}: {}",
                            root.display(),
                            cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn assemble(&self, root: &Path) -> Result<BuildReport> {
        let manifest = Manifest::load(&self.config.build.manifest)?;
        info!(
            "dependency manifest {}: {} pin(s)",
            self.config.build.manifest,
            manifest.len()
        );

        fs::create_dir_all(root).map_err(|e| {
            ForkliftError::build(format!(
                "cannot create runtime root {}: {}",
                root.display(),
                e
            ))
        })?;

        self.install_dependencies(root)?;
        self.stage_source(root)?;
        let credential_file = self.stage_credential(root)?;

        let metadata = ImageManifest {
            entry: self.config.app.entry.clone(),
            host: self.config.server.host.clone(),
            port: self.config.server.port,
            workers: self.config.server.workers,
            threads: self.config.server.threads,
            timeout: self.config.server.timeout,
            credential_file: credential_file.clone(),
            credential_env_var: self.config.credentials.env_var.clone(),
            run_as: self.config.identity.user.clone(),
            built_at: Utc::now(),
            pins: manifest.pins().iter().map(|p| p.to_string()).collect(),
        };
        metadata.write(root)?;

        info!("image assembled at {}", root.display());
        Ok(BuildReport {
            runtime_root: root.to_path_buf(),
            pin_count: manifest.len(),
            credentialed: credential_file.is_some(),
        })
    }

    /// Run the configured installer against the manifest, installing into
    /// `<root>/deps`. A non-zero exit is fatal.
    fn install_dependencies(&self, root: &Path) -> Result<()> {
        let target = root.join("deps");
        fs::create_dir_all(&target).map_err(|e| {
            ForkliftError::build(format!(
                "cannot create dependency target {}: {}",
                target.display(),
                e
            ))
        })?;

        let installer = &self.config.build.installer;
        debug!(
            "running installer: {} install --no-cache-dir -r {} --target {}",
            installer,
            self.config.build.manifest,
            target.display()
        );

        let status = Command::new(installer)
            .arg("install")
            .arg("--no-cache-dir")
            .arg("-r")
            .arg(&self.config.build.manifest)
            .arg("--target")
            .arg(&target)
            .status()
            .map_err(|e| {
                ForkliftError::build(format!("cannot run installer '{}': {}", installer, e))
            })?;

        if !status.success() {
            return Err(ForkliftError::build(format!(
                "installer '{}' failed with status {}",
                installer, status
            )));
        }

        Ok(())
    }

    /// Copy the application source tree into the root. A missing tree is
    /// fatal; the launcher has nothing to serve without it.
    fn stage_source(&self, root: &Path) -> Result<()> {
        let source = Path::new(&self.config.app.source_dir);
        if !source.is_dir() {
            return Err(ForkliftError::build(format!(
                "application source directory '{}' not found",
                source.display()
            )));
        }

        let dest = root.join(
            source
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("app")),
        );
        copy_dir_all(source, &dest).map_err(|e| {
            ForkliftError::build(format!(
                "failed to stage source tree {} -> {}: {}",
                source.display(),
                dest.display(),
                e
            ))
        })?;
        debug!("staged source tree at {}", dest.display());
        Ok(())
    }

    /// Credentialed variant only: the artifact must exist, or the image
    /// must not be produced.
    fn stage_credential(&self, root: &Path) -> Result<Option<String>> {
        let Some(file) = &self.config.credentials.file else {
            debug!("uncredentialed build, skipping credential staging");
            return Ok(None);
        };

        let source = Path::new(file);
        if !source.is_file() {
            return Err(ForkliftError::credential(format!(
                "credential artifact '{}' not found; the image must not be produced without it",
                source.display()
            )));
        }

        let dest = root.join(CREDENTIAL_FILE_NAME);
        fs::copy(source, &dest).map_err(|e| {
            ForkliftError::credential(format!(
                "failed to stage credential artifact {} -> {}: {}",
                source.display(),
                dest.display(),
                e
            ))
        })?;

        // Read-only for the owning account; never mutated at runtime
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o400);
            fs::set_permissions(&dest, perms).map_err(|e| {
                ForkliftError::credential(format!(
                    "failed to restrict credential permissions on {}: {}",
                    dest.display(),
                    e
                ))
            })?;
        }

        info!("credential artifact staged at {}", dest.display());
        Ok(Some(CREDENTIAL_FILE_NAME.to_string()))
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
        }
        // Symlinks and special files are not part of the image contract
    }
    Ok(())
}
