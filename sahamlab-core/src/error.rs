//! Error types for the core crate.
//!
//! Filtering itself never fails; everything here is about getting data in
//! (dataset, config) or parsing user-supplied names and bounds.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or writing a result dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read dataset header: {0}")]
    Header(#[source] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("malformed dataset row at line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write dataset: {0}")]
    Write(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from parsing names and bounds typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown indicator '{0}' (expected one of CCI, RSI, MACD, STO, SMACross)")]
    UnknownIndicator(String),

    #[error("unknown preset '{0}' (expected No Filter, Short Term or Long Term)")]
    UnknownPreset(String),

    #[error("unknown metric '{0}'")]
    UnknownMetric(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("invalid bounds '{0}' (expected LOW..HIGH, e.g. -70..0)")]
    InvalidBounds(String),
}

/// Errors from loading the dashboard configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors from installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log file in {path}: {reason}")]
    Appender { path: PathBuf, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}
