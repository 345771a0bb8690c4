//! Dependency manifest
//!
//! The build phase consumes a pinned manifest: one `name==version` pair per
//! line, `#` comments and blank lines ignored. Every pin must be exact;
//! ranges and unpinned names fail the build before the installer runs.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::{ForkliftError, Result};

/// A single exact dependency pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    pub version: String,
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// A parsed dependency manifest
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pins: Vec<Pin>,
}

impl Manifest {
    /// Load and parse a manifest file. A missing file is fatal to the build.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ForkliftError::manifest(format!(
                "cannot read dependency manifest {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse manifest text. Malformed lines carry their line number.
    pub fn parse(content: &str) -> Result<Self> {
        let mut pins: Vec<Pin> = Vec::new();

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = match raw_line.find('#') {
                Some(pos) => &raw_line[..pos],
                None => raw_line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let pin = Self::parse_pin(line)
                .map_err(|msg| ForkliftError::manifest(format!("line {}: {}", line_no, msg)))?;

            if let Some(existing) = pins.iter().find(|p| p.name == pin.name) {
                if existing.version == pin.version {
                    // Identical duplicate, collapse
                    continue;
                }
                return Err(ForkliftError::manifest(format!(
                    "line {}: conflicting pins for '{}': {} vs {}",
                    line_no, pin.name, existing.version, pin.version
                )));
            }

            pins.push(pin);
        }

        Ok(Self { pins })
    }

    fn parse_pin(line: &str) -> std::result::Result<Pin, String> {
        let (name, version) = line
            .split_once("==")
            .ok_or_else(|| format!("'{}' is not an exact pin (expected name==version)", line))?;

        let name = name.trim();
        let version = version.trim();

        if name.is_empty() {
            return Err("empty package name".to_string());
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(format!("invalid package name '{}'", name));
        }
        if version.is_empty() {
            return Err(format!("empty version for '{}'", name));
        }
        if !version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+' | '*'))
        {
            return Err(format!("invalid version '{}' for '{}'", version, name));
        }

        Ok(Pin {
            name: name.to_string(),
            version: version.to_string(),
        })
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }
}
