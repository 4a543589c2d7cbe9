//! # Process-wide Setup
//!
//! [`setup_logging`] wires the pipeline into the global `tracing` dispatcher:
//!
//! ```text
//! event ─▶ ChannelFilter ─▶ LineFormatter ─▶ StdoutSink (write + flush)
//!             (reloadable)    (+ thread name,   (errors ─▶ stderr)
//!                              + timestamp)
//! ```
//!
//! The subscriber is installed once, guarded by a `OnceLock`. Calling
//! [`setup_logging`] again swaps the installed filter through a reload handle
//! (last writer wins) and updates the VM trace flag; the formatter and sink
//! are stateless and stay in place.
//!
//! The VM trace flag is an `AtomicBool` that reads `false` until the first
//! call, so [`is_vm_trace_enabled`] is safe from any thread at any time.

use crate::config::LoggingOptions;
use crate::error::Result;
use crate::filter::ChannelFilter;
use crate::format::LineFormatter;
use crate::sink::StdoutSink;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, Layer, Registry};

static VM_TRACE: AtomicBool = AtomicBool::new(false);

static INSTALLED_FILTER: OnceLock<reload::Handle<ChannelFilter, Registry>> = OnceLock::new();

/// Install (or reconfigure) process-wide logging to standard output.
///
/// The first call installs the global subscriber. Later calls replace the
/// channel filter and VM trace flag with the new `options`.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInstalled`](crate::LoggingError::AlreadyInstalled)
/// when some other global subscriber was installed first, and
/// [`LoggingError::Reload`](crate::LoggingError::Reload) when reconfiguring
/// after such a failure. Log call sites never see errors.
pub fn setup_logging(options: &LoggingOptions) -> Result<()> {
    VM_TRACE.store(options.vm_trace, Ordering::Relaxed);

    let filter = ChannelFilter::from_options(options);
    let mut installing = None;
    let handle = INSTALLED_FILTER.get_or_init(|| {
        let (layer, handle) = reload::Layer::new(filter.clone());
        installing = Some(layer);
        handle
    });

    match installing {
        Some(filter_layer) => {
            let output = fmt::layer()
                .event_format(LineFormatter::new())
                .with_ansi(std::io::stdout().is_terminal())
                .with_writer(StdoutSink)
                .with_filter(filter_layer);
            tracing_subscriber::registry().with(output).try_init()?;
        }
        None => handle.reload(filter)?,
    }

    Ok(())
}

/// Whether VM tracing was requested by the most recent [`setup_logging`].
pub fn is_vm_trace_enabled() -> bool {
    VM_TRACE.load(Ordering::Relaxed)
}

/// Build the same pipeline as [`setup_logging`] without installing it.
///
/// Output goes to `make_writer` as plain text. Use it with
/// [`tracing::subscriber::with_default`] to scope logging to a closure, or to
/// embed the pipeline under a host's own dispatcher.
pub fn build_subscriber<T, W>(
    options: &LoggingOptions,
    formatter: LineFormatter<T>,
    make_writer: W,
) -> impl Subscriber + Send + Sync + 'static
where
    T: FormatTime + Send + Sync + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let output = fmt::layer()
        .event_format(formatter)
        .with_ansi(false)
        .with_writer(make_writer)
        .with_filter(ChannelFilter::from_options(options));

    tracing_subscriber::registry().with(output)
}
