use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use actix_web::web;

use crate::errors::{ForkliftError, Result};

use super::EntryPoint;

/// Mounts an application's routes onto a worker's HTTP app.
///
/// The factory is resolved once per worker and then reused by every
/// app-builder invocation across that worker's threads.
pub type AppFactory = Arc<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

pub type AppConstructor = Arc<dyn Fn() -> Result<AppFactory> + Send + Sync>;

static APP_REGISTRY: Lazy<RwLock<HashMap<String, AppConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_app_plugin<S: Into<String>>(name: S, constructor: AppConstructor) {
    let name = name.into();
    let mut registry = APP_REGISTRY
        .write()
        .expect("App registry RwLock poisoned - a thread panicked while holding the lock");
    registry.insert(name, constructor);
}

pub fn get_app_plugin(name: &str) -> Option<AppConstructor> {
    APP_REGISTRY
        .read()
        .expect("App registry RwLock poisoned - a thread panicked while holding the lock")
        .get(name)
        .cloned()
}

/// Entry point names currently registered, sorted for stable output
pub fn registered_entries() -> Vec<String> {
    let mut names: Vec<String> = APP_REGISTRY
        .read()
        .expect("App registry RwLock poisoned - a thread panicked while holding the lock")
        .keys()
        .cloned()
        .collect();
    names.sort();
    names
}

/// The one-time entry point lookup a worker performs at startup.
///
/// An unknown reference is fatal for the worker; the error names every
/// registered entry so a typo is obvious in the log.
pub fn resolve(entry: &EntryPoint) -> Result<AppFactory> {
    let name = entry.to_string();
    let constructor = get_app_plugin(&name).ok_or_else(|| {
        let registered = registered_entries();
        ForkliftError::entry_point(format!(
            "no application registered for entry point '{}' (registered: {})",
            name,
            if registered.is_empty() {
                "none".to_string()
            } else {
                registered.join(", ")
            }
        ))
    })?;
    constructor()
}

pub fn debug_app_registry() {
    let registry = APP_REGISTRY.read().expect("App registry RwLock poisoned");
    if registry.is_empty() {
        tracing::debug!("No application plugins registered.");
    } else {
        tracing::debug!("Registered application plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
