use std::sync::Arc;

use actix_web::web;
use forklift::app::{
    register_app_plugin, registered_entries, resolve, AppFactory, EntryPoint,
};

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_valid_reference() {
        let entry: EntryPoint = "wsgi:app".parse().unwrap();
        assert_eq!(entry.module(), "wsgi");
        assert_eq!(entry.attribute(), "app");
    }

    #[test]
    fn test_invalid_references_are_descriptive() {
        for (input, fragment) in [
            ("wsgiapp", "exactly one ':'"),
            ("a:b:c", "exactly one ':'"),
            (":app", "empty module"),
            ("wsgi:", "empty attribute"),
        ] {
            let err = input.parse::<EntryPoint>().unwrap_err();
            assert_eq!(err.code(), "E005");
            assert!(
                err.message().contains(fragment),
                "'{}' should mention '{}', got: {}",
                input,
                fragment,
                err.message()
            );
        }
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;

    fn noop_mount(_cfg: &mut web::ServiceConfig) {}

    #[test]
    fn test_builtin_health_is_registered() {
        assert!(registered_entries().contains(&"builtin:health".to_string()));
        let entry: EntryPoint = "builtin:health".parse().unwrap();
        assert!(resolve(&entry).is_ok());
    }

    #[test]
    fn test_registered_factory_resolves() {
        register_app_plugin(
            "demo:app",
            Arc::new(|| Ok(Arc::new(noop_mount) as AppFactory)),
        );

        let entry: EntryPoint = "demo:app".parse().unwrap();
        assert!(resolve(&entry).is_ok());
        assert!(registered_entries().contains(&"demo:app".to_string()));
    }

    #[test]
    fn test_unknown_entry_lists_registered_names() {
        let entry: EntryPoint = "ghost:app".parse().unwrap();
        let err = resolve(&entry).err().unwrap();

        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("ghost:app"));
        assert!(err.message().contains("builtin:health"));
    }

    #[test]
    fn test_constructor_failure_propagates() {
        register_app_plugin(
            "broken:app",
            Arc::new(|| {
                Err(forklift::errors::ForkliftError::entry_point(
                    "constructor exploded",
                ))
            }),
        );

        let entry: EntryPoint = "broken:app".parse().unwrap();
        let err = resolve(&entry).err().unwrap();
        assert!(err.message().contains("constructor exploded"));
    }
}
