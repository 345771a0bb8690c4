//! Logging system initialization
//!
//! Sets up the tracing subscriber from the `[logging]` configuration.
//!
//! The subscriber installed here is inherited by every worker across
//! `fork`, so the writer must not depend on a helper thread: a non-blocking
//! writer's drain thread is not duplicated into children and their log
//! lines would vanish. All writers below write directly on the caller's
//! thread.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::EnvFilter;

use crate::config::StaticConfig;

#[derive(Clone)]
enum LogWriter {
    Stdout,
    File(Arc<File>),
    Rolling(Arc<Mutex<RollingFileAppender>>),
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::Stdout => io::stdout().write(buf),
            LogWriter::File(file) => (&**file).write(buf),
            LogWriter::Rolling(appender) => appender
                .lock()
                .expect("Log appender Mutex poisoned - a thread panicked while holding the lock")
                .write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::Stdout => io::stdout().flush(),
            LogWriter::File(file) => (&**file).flush(),
            LogWriter::Rolling(appender) => appender
                .lock()
                .expect("Log appender Mutex poisoned - a thread panicked while holding the lock")
                .flush(),
        }
    }
}

/// Initialize the logging system based on configuration
///
/// **Note**: This should be called only once during startup, after the
/// configuration has been loaded and before the supervisor forks.
///
/// # Panics
/// * If creating the rolling log appender fails
/// * If setting the global subscriber fails (e.g., already initialized)
pub fn init_logging(config: &StaticConfig) {
    let writer = match &config.logging.file {
        Some(log_file) if !log_file.is_empty() && config.logging.enable_rotation => {
            let dir = Path::new(log_file).parent().unwrap_or(Path::new("."));
            let filename = Path::new(log_file)
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("forklift.log"));
            let filename_str = filename.to_str().unwrap_or("forklift.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename_str.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.logging.max_backups as usize)
                .build(dir)
                .expect("Failed to create rolling log appender");
            LogWriter::Rolling(Arc::new(Mutex::new(appender)))
        }
        Some(log_file) if !log_file.is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .expect("Failed to open log file");
            LogWriter::File(Arc::new(file))
        }
        _ => LogWriter::Stdout,
    };

    let ansi = matches!(writer, LogWriter::Stdout);
    let filter = EnvFilter::new(config.logging.level.clone());

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(ansi);

    if config.logging.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }
}
