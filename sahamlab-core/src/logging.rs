//! Tracing subscriber setup shared by the binaries.
//!
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::LoggingError;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to stderr. Used by the CLI, whose stdout carries results.
pub fn init_stderr(level: &str) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

/// Log to a daily-rotated file under `directory`. Used by the dashboard,
/// which owns the terminal.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the background writer.
pub fn init_file(directory: &Path, level: &str) -> Result<WorkerGuard, LoggingError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("sahamlab")
        .filename_suffix("log")
        .build(directory)
        .map_err(|e| LoggingError::Appender {
            path: directory.to_path_buf(),
            reason: e.to_string(),
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;
    Ok(guard)
}
