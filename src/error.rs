//! Error types shared by the loading and configuration layers.

use thiserror::Error;

/// A timestamp field that could not be turned into a UTC instant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid timestamp {raw:?}: {reason}")]
pub struct TimestampError {
    pub raw: String,
    pub reason: String,
}

/// Fatal errors raised while loading an export.
///
/// Schema drift is not represented here: it is reported as a warning and
/// loading carries on positionally.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed row at line {line}, column {column:?} (value {value:?}): {reason}")]
    MalformedRow {
        line: u64,
        column: &'static str,
        value: String,
        reason: String,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid analysis configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one rolling window is required")]
    NoWindows,
    #[error("rolling window must be in 1..={max} days, but is {days}")]
    WindowOutOfRange { days: u32, max: u32 },
    #[error("rolling window of {0} days is listed more than once")]
    DuplicateWindow(u32),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
