//! Logging configuration.
//!
//! [`LoggingOptions`] is produced once at process start (from CLI flags, a
//! JSON file, or code) and is immutable after [`crate::setup_logging`]
//! applies it. Malformed channel sets are not validated: an include set that
//! names no real channel simply drops everything.

use crate::error::{LoggingError, Result};
use crate::verbosity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Options applied by [`crate::setup_logging`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Inclusive severity threshold
    pub verbosity: Severity,
    /// Channels to show; empty means all channels
    pub include_channels: BTreeSet<String>,
    /// Channels to hide; applied after `include_channels`
    pub exclude_channels: BTreeSet<String>,
    /// Enable VM tracing
    pub vm_trace: bool,
}

impl LoggingOptions {
    /// Options with the given threshold and no channel restrictions.
    pub fn with_verbosity(verbosity: Severity) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    /// Parse options from a JSON document. Missing fields take their defaults.
    ///
    /// ```rust
    /// # use chanlog::{LoggingOptions, Severity};
    /// let options = LoggingOptions::from_json_str(
    ///     r#"{ "verbosity": "debug", "exclude_channels": ["noisy"] }"#,
    /// ).unwrap();
    /// assert_eq!(options.verbosity, Severity::Debug);
    /// assert!(options.exclude_channels.contains("noisy"));
    /// assert!(!options.vm_trace);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoggingError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}
