//! User interfaces
//!
//! Currently just the command-line interface.

pub mod cli;
