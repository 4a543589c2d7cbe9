//! # Record Filter
//!
//! Decides whether a record is emitted before any formatting work happens.
//! The decision depends only on the record's severity and channel:
//!
//! 1. A record whose severity is numerically greater than the configured
//!    verbosity is dropped. The threshold is inclusive.
//! 2. Otherwise the channel must be in the include set (an empty include set
//!    admits every channel) and must not be in the exclude set.
//!
//! Exclusion always wins when a channel appears in both sets.
//!
//! ## Hot Path
//!
//! [`ChannelFilter`] is installed as a per-layer [`Filter`]. Its
//! `callsite_enabled` answers `always`/`never`, which `tracing` caches per
//! call site, so a rejected call site normally costs a single cached interest
//! check. `enabled` evaluates the same predicate for the cases where the
//! interest cannot be cached (for instance several dispatchers alive in one
//! process). Neither path touches the message.

use crate::config::LoggingOptions;
use crate::verbosity::Severity;
use std::collections::HashSet;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::Interest;
use tracing::Metadata;
use tracing_subscriber::layer::{Context, Filter};

/// Severity threshold plus channel allow/deny sets
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelFilter {
    verbosity: Severity,
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl ChannelFilter {
    /// Create a filter with no channel restrictions.
    pub fn new(verbosity: Severity) -> Self {
        Self {
            verbosity,
            include: HashSet::new(),
            exclude: HashSet::new(),
        }
    }

    /// Snapshot the filtering part of `options`.
    pub fn from_options(options: &LoggingOptions) -> Self {
        Self {
            verbosity: options.verbosity,
            include: options.include_channels.iter().cloned().collect(),
            exclude: options.exclude_channels.iter().cloned().collect(),
        }
    }

    /// Only admit the given channels (in addition to any already included).
    pub fn include<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(channels.into_iter().map(Into::into));
        self
    }

    /// Reject the given channels regardless of the include set.
    pub fn exclude<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(channels.into_iter().map(Into::into));
        self
    }

    /// The inclusive severity threshold.
    pub fn verbosity(&self) -> Severity {
        self.verbosity
    }

    /// Decide whether a record with `severity` on `channel` is emitted.
    #[inline]
    pub fn accept(&self, severity: Severity, channel: &str) -> bool {
        if !severity.within(self.verbosity) {
            return false;
        }

        (self.include.is_empty() || self.include.contains(channel))
            && !self.exclude.contains(channel)
    }

    fn accepts_metadata(&self, metadata: &Metadata<'_>) -> bool {
        self.accept(Severity::from(metadata.level()), metadata.target())
    }
}

impl<S> Filter<S> for ChannelFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        self.accepts_metadata(metadata)
    }

    fn callsite_enabled(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.accepts_metadata(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(LevelFilter::from(self.verbosity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Threshold is inclusive and lower values are always admitted
    #[test]
    fn test_severity_threshold() {
        let filter = ChannelFilter::new(Severity::Warning);

        assert!(filter.accept(Severity::Error, "p2p"));
        assert!(filter.accept(Severity::Warning, "p2p"));
        assert!(!filter.accept(Severity::Info, "p2p"));
        assert!(!filter.accept(Severity::Trace, "p2p"));
    }

    /// An empty include set admits every channel
    #[test]
    fn test_no_channel_restrictions() {
        let filter = ChannelFilter::new(Severity::Trace);

        for channel in ["p2p", "sync", "", "VM", "a very long channel name"] {
            assert!(filter.accept(Severity::Trace, channel));
        }
    }

    /// A non-empty include set admits only its members
    #[test]
    fn test_include_channels() {
        let filter = ChannelFilter::new(Severity::Info).include(["p2p", "sync"]);

        assert!(filter.accept(Severity::Info, "p2p"));
        assert!(filter.accept(Severity::Error, "sync"));
        assert!(!filter.accept(Severity::Error, "net"));
        assert!(!filter.accept(Severity::Info, "P2P"));
    }

    /// Exclusion wins over inclusion
    #[test]
    fn test_exclude_dominates_include() {
        let filter = ChannelFilter::new(Severity::Trace)
            .include(["p2p", "sync"])
            .exclude(["sync"]);

        assert!(filter.accept(Severity::Info, "p2p"));
        assert!(!filter.accept(Severity::Error, "sync"));
    }

    /// Warning threshold with a noisy channel excluded
    #[test]
    fn test_noisy_channel_scenario() {
        let filter = ChannelFilter::new(Severity::Warning).exclude(["noisy"]);

        assert!(!filter.accept(Severity::Info, "noisy"));
        assert!(!filter.accept(Severity::Error, "noisy"));
        assert!(filter.accept(Severity::Warning, "p2p"));
        assert!(!filter.accept(Severity::Debug, "p2p"));
    }

    #[test]
    fn test_from_options() {
        let options = LoggingOptions {
            verbosity: Severity::Debug,
            include_channels: ["net".to_string()].into_iter().collect(),
            exclude_channels: ["noisy".to_string()].into_iter().collect(),
            vm_trace: true,
        };
        let filter = ChannelFilter::from_options(&options);

        assert_eq!(filter.verbosity(), Severity::Debug);
        assert!(filter.accept(Severity::Debug, "net"));
        assert!(!filter.accept(Severity::Debug, "noisy"));
        assert!(!filter.accept(Severity::Debug, "p2p"));
        assert!(!filter.accept(Severity::Trace, "net"));
    }

    #[test]
    fn test_max_level_hint_tracks_verbosity() {
        let filter = ChannelFilter::new(Severity::Info);
        assert_eq!(
            <ChannelFilter as Filter<tracing_subscriber::Registry>>::max_level_hint(&filter),
            Some(LevelFilter::INFO)
        );
    }
}
