//! Error types for logging setup and the record write path.

use std::io;
use std::path::PathBuf;

/// Errors produced by the logging facility.
///
/// Only configuration-time operations (`setup_logging`, option loading)
/// return these to callers. Failures on the record path are rendered through
/// [`crate::sink::report_internal_error`] and swallowed.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Writing or flushing a record failed
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// A record could not be rendered
    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),

    /// Another global subscriber was installed before `setup_logging`
    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),

    /// Rendering a record panicked
    #[error("panic while formatting a record: {0}")]
    Panic(String),

    /// The installed filter could not be replaced
    #[error("failed to replace the installed filter: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),

    /// A verbosity value outside 0..=4
    #[error("verbosity {0} is out of range (expected 0 to 4)")]
    InvalidVerbosity(i64),

    /// Malformed JSON configuration
    #[error("invalid logging configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration file could not be read
    #[error("cannot read logging configuration {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result alias for logging operations
pub type Result<T> = std::result::Result<T, LoggingError>;
