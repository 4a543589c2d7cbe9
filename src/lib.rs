//! # chanlog
//!
//! Process-wide structured logging for multi-threaded programs. Every record
//! carries a severity, a channel, the emitting thread's name and a local
//! timestamp; records are filtered before any formatting work, rendered as a
//! fixed-layout line, and written to standard output with a flush per record.
//!
//! ## Architecture Overview
//!
//! The crate sits on top of `tracing`. A record is a `tracing` event, the
//! channel is the event target, and the optional `prefix`/`suffix` fields
//! decorate the line:
//!
//! - `verbosity`: the ordered severity scale and its labels
//! - `filter`: the severity/channel predicate, installed as a per-layer filter
//! - `format`: the fixed line layout and the `tracing` event formatter
//! - `thread_name`: per-thread names, native where the OS supports them
//! - `sink`: flush-per-record stdout writer and the internal error channel
//! - `facade`: one-time global installation and the VM trace flag
//! - `config` and `cli`: options from JSON files and command-line flags
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use chanlog::{setup_logging, set_thread_name, LoggingOptions, Severity};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut options = LoggingOptions::with_verbosity(Severity::Debug);
//!     options.exclude_channels.insert("noisy".into());
//!     setup_logging(&options)?;
//!
//!     set_thread_name("main");
//!     tracing::info!(target: "p2p", prefix = "peer#3", "connected");
//!     tracing::warn!(target: "sync", suffix = "(retrying)", "block import stalled");
//!     tracing::debug!(target: "noisy", "never printed");
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Model
//!
//! Logging never fails the caller. Write, flush and formatting errors are
//! reported on standard error as `Exception from the logging library: ...`
//! and the record is dropped.

pub mod cli;
pub mod config;
pub mod error;
pub mod facade;
pub mod filter;
pub mod format;
pub mod sink;
pub mod thread_name;
pub mod verbosity;

pub use config::LoggingOptions;
pub use error::LoggingError;
pub use facade::{build_subscriber, is_vm_trace_enabled, setup_logging};
pub use filter::ChannelFilter;
pub use format::{format_record, LineFormatter, Record};
pub use thread_name::{set_thread_name, thread_name};
pub use verbosity::{verbosity_to_string, Severity};

/// The current version of chanlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default values for the demo binary
pub mod defaults {
    /// Default number of worker threads
    pub const WORKERS: usize = 3;

    /// Default number of records per worker
    pub const RECORDS: usize = 5;
}
