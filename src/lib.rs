//! Forklift - A pre-fork HTTP application launcher
//!
//! This library provides the core functionality for the Forklift launcher:
//! image assembly, credential provisioning, and a supervised pre-fork
//! worker pool serving a registered application object.
//!
//! # Features
//! - **server**: supervisor and worker runtime (default)
//! - **cli**: command-line interface
//!
//! # Architecture
//! - `manifest`: dependency manifest parsing
//! - `image`: build phase (runtime root assembly, image metadata)
//! - `app`: entry point contract and application registry
//! - `supervisor`: pre-fork parent (reap, restart, request-timeout watchdog)
//! - `worker`: per-process HTTP server and in-flight accounting
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging, PID file, credentials, privileges, signals

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod image;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod manifest;
pub mod runtime;
pub mod supervisor;
pub mod system;
pub mod worker;
