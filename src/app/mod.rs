//! Application contract
//!
//! The launcher serves exactly one application object, named by an entry
//! point reference of the form `module:attribute`. Resolution is an
//! explicit registry lookup performed once at worker startup; there is no
//! deferred or implicit binding, and an unknown reference fails the worker
//! fast with a descriptive error.

pub mod builtin;
pub mod macros;
pub mod register;

pub use register::{
    debug_app_registry, get_app_plugin, register_app_plugin, registered_entries, resolve,
    AppConstructor, AppFactory,
};

use std::fmt;
use std::str::FromStr;

use crate::errors::ForkliftError;

/// A validated `module:attribute` entry point reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPoint {
    module: String,
    attribute: String,
}

impl EntryPoint {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl FromStr for EntryPoint {
    type Err = ForkliftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (module, attribute) = match (parts.next(), parts.next(), parts.next()) {
            (Some(module), Some(attribute), None) => (module.trim(), attribute.trim()),
            _ => {
                return Err(ForkliftError::entry_point(format!(
                    "invalid entry point '{}': expected exactly one ':' (module:attribute)",
                    s
                )));
            }
        };

        for (part, label) in [(module, "module"), (attribute, "attribute")] {
            if part.is_empty() {
                return Err(ForkliftError::entry_point(format!(
                    "invalid entry point '{}': empty {}",
                    s, label
                )));
            }
            if !part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))
            {
                return Err(ForkliftError::entry_point(format!(
                    "invalid entry point '{}': {} '{}' contains unsupported characters",
                    s, label, part
                )));
            }
        }

        Ok(Self {
            module: module.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_module_attribute() {
        let entry: EntryPoint = "wsgi:app".parse().unwrap();
        assert_eq!(entry.module(), "wsgi");
        assert_eq!(entry.attribute(), "app");
        assert_eq!(entry.to_string(), "wsgi:app");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!("wsgiapp".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn rejects_extra_separator() {
        assert!("a:b:c".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn rejects_empty_sides() {
        assert!(":app".parse::<EntryPoint>().is_err());
        assert!("wsgi:".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn rejects_unsupported_characters() {
        assert!("ws gi:app".parse::<EntryPoint>().is_err());
        assert!("wsgi:app()".parse::<EntryPoint>().is_err());
    }

    #[test]
    fn dotted_module_paths_accepted() {
        let entry: EntryPoint = "app.server:application".parse().unwrap();
        assert_eq!(entry.module(), "app.server");
    }
}
