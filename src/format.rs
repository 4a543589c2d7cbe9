//! # Record Formatter
//!
//! Renders an accepted record as one line with a fixed layout, fields
//! separated by single spaces:
//!
//! ```text
//! SEVER MM-DD HH:MM:SS THRD CHANNL [PREFIX ]MESSAGE[ SUFFIX]
//! WARN  10-16 09:05:03 main p2p    peer#3 disconnected reason=timeout
//! ```
//!
//! 1. Severity label, left-justified to width 5
//! 2. Local timestamp `%m-%d %H:%M:%S`
//! 3. Thread name, left-justified to width 4
//! 4. Channel, left-justified to width 6
//! 5. Prefix, only when the record has one
//! 6. Message, verbatim
//! 7. Suffix after one space, only when the record has one
//!
//! Widths are minimums: longer content grows the field and is never cut.
//! With ANSI enabled the timestamp is magenta and the thread name, prefix and
//! suffix are blue; the plain rendering is what callers should parse.
//!
//! [`LineFormatter`] adapts this layout to `tracing` events. The channel is
//! the event target, the `prefix` and `suffix` fields fill the optional
//! fields, and any other fields follow the message as ` name=value`.
//! Records bridged from the `log` crate are rendered from their normalized
//! metadata, so their channel is the original `log` target.
//!
//! A field whose `Debug`/`Display` impl panics does not unwind into the log
//! call: the panic is reported on the error channel and the line is written
//! with whatever was rendered before it.

use crate::error::LoggingError;
use crate::sink::report_internal_error;
use crate::thread_name::thread_name;
use crate::verbosity::Severity;
use colored::Colorize;
use std::fmt::{self, Write as _};
use std::panic::{self, AssertUnwindSafe};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// `strftime` layout of the timestamp field
pub const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";

const SEVERITY_WIDTH: usize = 5;
const THREAD_WIDTH: usize = 4;
const CHANNEL_WIDTH: usize = 6;

/// One accepted record with every attribute attached
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    pub severity: Severity,
    pub timestamp: &'a str,
    pub thread_name: &'a str,
    pub channel: &'a str,
    pub prefix: Option<&'a str>,
    pub message: &'a str,
    pub suffix: Option<&'a str>,
}

/// Write `record` in the fixed layout, without a line terminator.
pub fn write_record<W: fmt::Write>(out: &mut W, record: &Record<'_>, ansi: bool) -> fmt::Result {
    write!(out, "{:<SEVERITY_WIDTH$} ", record.severity.label())?;

    if ansi {
        write!(out, "{} ", record.timestamp.magenta())?;
        let thread = format!("{:<THREAD_WIDTH$}", record.thread_name);
        write!(out, "{} ", thread.blue())?;
    } else {
        write!(out, "{} ", record.timestamp)?;
        write!(out, "{:<THREAD_WIDTH$} ", record.thread_name)?;
    }

    write!(out, "{:<CHANNEL_WIDTH$} ", record.channel)?;

    if let Some(prefix) = record.prefix {
        if ansi {
            write!(out, "{} ", prefix.blue())?;
        } else {
            write!(out, "{prefix} ")?;
        }
    }

    out.write_str(record.message)?;

    if let Some(suffix) = record.suffix {
        if ansi {
            write!(out, " {}", suffix.blue())?;
        } else {
            write!(out, " {suffix}")?;
        }
    }

    Ok(())
}

/// Render `record` as plain text.
pub fn format_record(record: &Record<'_>) -> String {
    let mut line = String::new();
    // Writing into a String only fails if a Display impl does, and ours don't.
    let _ = write_record(&mut line, record, false);
    line
}

/// Wall-clock timestamp in local time
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Event fields split into the parts of a record
#[derive(Default)]
struct RecordFields {
    message: String,
    prefix: Option<String>,
    suffix: Option<String>,
    extra: String,
    failed: bool,
}

impl RecordFields {
    fn check(&mut self, result: fmt::Result) {
        self.failed |= result.is_err();
    }

    fn message(&self) -> String {
        let mut message = String::with_capacity(self.message.len() + self.extra.len());
        message.push_str(&self.message);
        message.push_str(&self.extra);
        message
    }
}

impl Visit for RecordFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            "prefix" => self.prefix = Some(value.to_owned()),
            "suffix" => self.suffix = Some(value.to_owned()),
            name if name.starts_with("log.") => {}
            name => {
                let result = write!(self.extra, " {name}={value}");
                self.check(result);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let result = match field.name() {
            "message" => write!(self.message, "{value:?}"),
            "prefix" => {
                let mut prefix = String::new();
                let result = write!(prefix, "{value:?}");
                self.prefix = Some(prefix);
                result
            }
            "suffix" => {
                let mut suffix = String::new();
                let result = write!(suffix, "{value:?}");
                self.suffix = Some(suffix);
                result
            }
            name if name.starts_with("log.") => Ok(()),
            name => write!(self.extra, " {name}={value:?}"),
        };
        self.check(result);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

/// `tracing` event formatter producing the fixed record layout
#[derive(Clone, Debug, Default)]
pub struct LineFormatter<T = LocalTimestamp> {
    timer: T,
}

impl LineFormatter {
    /// Formatter stamping records with the local wall clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> LineFormatter<T> {
    /// Use another timestamp source.
    pub fn with_timer<T2: FormatTime>(self, timer: T2) -> LineFormatter<T2> {
        LineFormatter { timer }
    }
}

impl<S, N, T> FormatEvent<S, N> for LineFormatter<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let normalized = event.normalized_metadata();
        let metadata = normalized.as_ref().unwrap_or_else(|| event.metadata());

        let mut timestamp = String::new();
        if let Err(err) = self.timer.format_time(&mut Writer::new(&mut timestamp)) {
            report_internal_error(&LoggingError::Format(err));
        }

        let mut fields = RecordFields::default();
        let recorded = panic::catch_unwind(AssertUnwindSafe(|| event.record(&mut fields)));
        if let Err(payload) = recorded {
            report_internal_error(&LoggingError::Panic(panic_message(payload.as_ref())));
        }
        if fields.failed {
            report_internal_error(&LoggingError::Format(fmt::Error));
        }

        let thread = thread_name();
        let message = fields.message();
        let record = Record {
            severity: Severity::from(metadata.level()),
            timestamp: &timestamp,
            thread_name: &thread,
            channel: metadata.target(),
            prefix: fields.prefix.as_deref(),
            message: &message,
            suffix: fields.suffix.as_deref(),
        };

        let ansi = writer.has_ansi_escapes();
        write_record(&mut writer, &record, ansi)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn record<'a>(message: &'a str) -> Record<'a> {
        Record {
            severity: Severity::Info,
            timestamp: "10-16 09:05:03",
            thread_name: "main",
            channel: "p2p",
            prefix: None,
            message,
            suffix: None,
        }
    }

    #[test]
    fn test_basic_layout() {
        assert_eq!(
            format_record(&record("hello")),
            "INFO  10-16 09:05:03 main p2p    hello"
        );
    }

    /// Short fields are padded on the right to their widths
    #[test]
    fn test_padding() {
        let line = format_record(&Record {
            severity: Severity::Warning,
            thread_name: "w",
            channel: "",
            ..record("msg")
        });
        assert_eq!(line, "WARN  10-16 09:05:03 w           msg");
    }

    /// Wide fields grow instead of being truncated
    #[test]
    fn test_wide_fields_are_not_truncated() {
        let line = format_record(&Record {
            severity: Severity::Debug,
            thread_name: "import-worker",
            channel: "blockchain",
            ..record("msg")
        });
        assert_eq!(line, "DEBUG 10-16 09:05:03 import-worker blockchain msg");
    }

    /// Absent prefix leaves no empty field behind
    #[test]
    fn test_prefix_and_suffix_presence() {
        let plain = format_record(&record("msg"));
        assert_eq!(plain, "INFO  10-16 09:05:03 main p2p    msg");

        let wide_channel = format_record(&Record {
            channel: "blockchain",
            ..record("msg")
        });
        assert_eq!(wide_channel, "INFO  10-16 09:05:03 main blockchain msg");
        assert!(wide_channel.ends_with("blockchain msg"));

        let prefixed = format_record(&Record {
            prefix: Some("peer#3"),
            ..record("msg")
        });
        assert_eq!(prefixed, "INFO  10-16 09:05:03 main p2p    peer#3 msg");

        let suffixed = format_record(&Record {
            suffix: Some("(2 retries)"),
            ..record("msg")
        });
        assert_eq!(suffixed, "INFO  10-16 09:05:03 main p2p    msg (2 retries)");

        let both = format_record(&Record {
            prefix: Some("[a]"),
            suffix: Some("[b]"),
            ..record("msg")
        });
        assert!(both.ends_with("[a] msg [b]"));
    }

    /// Message text is written verbatim
    #[test]
    fn test_message_verbatim() {
        let message = "tab\there \"quoted\" {braces} 100%";
        assert!(format_record(&record(message)).ends_with(message));
    }

    #[test]
    fn test_repeatable_output() {
        let rec = Record {
            prefix: Some("x"),
            suffix: Some("y"),
            ..record("same")
        };
        assert_eq!(format_record(&rec), format_record(&rec));
    }

    /// ANSI rendering wraps the cosmetic fields without changing the text
    #[test]
    fn test_ansi_rendering_keeps_text() {
        colored::control::set_override(true);
        let mut line = String::new();
        write_record(
            &mut line,
            &Record {
                prefix: Some("peer"),
                ..record("msg")
            },
            true,
        )
        .unwrap();

        assert!(line.contains('\u{1b}'));
        assert!(line.starts_with("INFO  "));
        assert!(line.contains("10-16 09:05:03"));
        assert!(line.contains("main"));
        assert!(line.contains("p2p    "));
        assert!(line.ends_with("msg"));
    }

    #[test]
    fn test_timestamp_layout() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_milli_opt(9, 5, 3, 250)
            .unwrap();
        let at = Utc.from_utc_datetime(&at);
        assert_eq!(at.format(TIMESTAMP_FORMAT).to_string(), "03-07 09:05:03");
    }
}
