//! # Severity Scale
//!
//! Records are ranked on a fixed five-step scale. Lower numeric values are
//! more severe, so a verbosity threshold is an inclusive upper bound: a
//! record passes when its severity value is less than or equal to the
//! threshold.
//!
//! | Value | Severity  | Label   | `tracing` level |
//! |-------|-----------|---------|-----------------|
//! | 0     | `Error`   | `ERROR` | `ERROR`         |
//! | 1     | `Warning` | `WARN`  | `WARN`          |
//! | 2     | `Info`    | `INFO`  | `INFO`          |
//! | 3     | `Debug`   | `DEBUG` | `DEBUG`         |
//! | 4     | `Trace`   | `TRACE` | `TRACE`         |
//!
//! The ordering is baked into the discriminants and is never changed at
//! runtime. `Severity` derives `Ord` from those discriminants, so
//! `Severity::Error < Severity::Trace`.

use crate::error::LoggingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Ordered severity of a log record
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// Failures the application cannot recover from on its own
    Error = 0,
    /// Unexpected conditions that do not stop the operation
    Warning = 1,
    /// Normal operational messages
    #[default]
    Info = 2,
    /// Diagnostic detail for developers
    Debug = 3,
    /// Very fine-grained diagnostics
    Trace = 4,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    /// Numeric value of the severity (0 = most severe).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Fixed output label, at most five characters wide.
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    /// Whether a record of this severity passes an inclusive `threshold`.
    #[inline]
    pub fn within(self, threshold: Severity) -> bool {
        self <= threshold
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Map a raw verbosity value to its label.
///
/// Out-of-range values map to the empty string rather than failing, so a
/// corrupted or foreign severity never breaks line rendering.
///
/// ```rust
/// # use chanlog::verbosity::verbosity_to_string;
/// assert_eq!(verbosity_to_string(0), "ERROR");
/// assert_eq!(verbosity_to_string(1), "WARN");
/// assert_eq!(verbosity_to_string(7), "");
/// assert_eq!(verbosity_to_string(-1), "");
/// ```
pub fn verbosity_to_string(verbosity: i64) -> &'static str {
    Severity::try_from(verbosity).map_or("", Severity::label)
}

impl TryFrom<i64> for Severity {
    type Error = LoggingError;

    fn try_from(value: i64) -> Result<Self, LoggingError> {
        match value {
            0 => Ok(Severity::Error),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Info),
            3 => Ok(Severity::Debug),
            4 => Ok(Severity::Trace),
            other => Err(LoggingError::InvalidVerbosity(other)),
        }
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            Level::INFO => Severity::Info,
            Level::DEBUG => Severity::Debug,
            Level::TRACE => Severity::Trace,
        }
    }
}

impl From<&Level> for Severity {
    fn from(level: &Level) -> Self {
        Severity::from(*level)
    }
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARN,
            Severity::Info => Level::INFO,
            Severity::Debug => Level::DEBUG,
            Severity::Trace => Level::TRACE,
        }
    }
}

impl From<Severity> for LevelFilter {
    fn from(severity: Severity) -> Self {
        LevelFilter::from_level(Level::from(severity))
    }
}
