use crate::config::LoggingOptions;
use crate::error::Result;
use crate::verbosity::Severity;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Logging flags, meant to be `#[clap(flatten)]`ed into a host's parser
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingArgs {
    /// Set the log verbosity from 0 (errors only) to 4 (trace) [default: 2]
    #[clap(
        short = 'v',
        long = "log-verbosity",
        value_name = "0-4",
        value_parser = clap::value_parser!(i64).range(0..=4),
        help_heading = "Logging Options"
    )]
    pub verbosity: Option<i64>,

    /// Log channels to show (default: show all channels)
    #[clap(long = "log-channels", value_name = "CHANNEL", num_args = 1.., help_heading = "Logging Options")]
    pub channels: Vec<String>,

    /// Log channels to hide
    #[clap(long = "log-exclude-channels", value_name = "CHANNEL", num_args = 1.., help_heading = "Logging Options")]
    pub exclude_channels: Vec<String>,

    /// Enable VM trace log (needs log verbosity 4 to be visible)
    #[clap(long = "log-vmtrace", default_value_t = false, help_heading = "Logging Options")]
    pub vm_trace: bool,

    /// JSON file with base logging options; the flags above refine it
    #[clap(long = "log-config", value_name = "PATH", help_heading = "Logging Options")]
    pub config: Option<PathBuf>,
}

impl LoggingArgs {
    /// Resolve the flags (and optional config file) into options.
    pub fn to_options(&self) -> Result<LoggingOptions> {
        let mut options = match &self.config {
            Some(path) => LoggingOptions::load(path)?,
            None => LoggingOptions::default(),
        };

        if let Some(verbosity) = self.verbosity {
            options.verbosity = Severity::try_from(verbosity)?;
        }
        options.include_channels.extend(self.channels.iter().cloned());
        options.exclude_channels.extend(self.exclude_channels.iter().cloned());
        options.vm_trace |= self.vm_trace;

        Ok(options)
    }
}

/// chanlog - channel-filtered logging demo
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
pub struct Cli {
    #[clap(flatten)]
    pub logging: LoggingArgs,

    /// Number of worker threads emitting records
    #[clap(short = 'w', long, default_value_t = crate::defaults::WORKERS)]
    pub workers: usize,

    /// Records emitted by each worker
    #[clap(short = 'r', long, default_value_t = crate::defaults::RECORDS)]
    pub records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chanlog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.workers, crate::defaults::WORKERS);
        assert_eq!(cli.records, crate::defaults::RECORDS);
        assert_eq!(cli.logging.to_options().unwrap(), LoggingOptions::default());
    }

    #[test]
    fn test_logging_flags() {
        let cli = parse(&[
            "-v",
            "4",
            "--log-channels",
            "p2p",
            "sync",
            "--log-exclude-channels",
            "noisy",
            "--log-vmtrace",
        ]);
        let options = cli.logging.to_options().unwrap();

        assert_eq!(options.verbosity, Severity::Trace);
        assert_eq!(
            options.include_channels.iter().collect::<Vec<_>>(),
            vec!["p2p", "sync"]
        );
        assert!(options.exclude_channels.contains("noisy"));
        assert!(options.vm_trace);
    }

    /// Verbosity outside 0..=4 is rejected at parse time
    #[test]
    fn test_verbosity_range() {
        assert!(Cli::try_parse_from(["chanlog", "-v", "5"]).is_err());
        assert!(Cli::try_parse_from(["chanlog", "--log-verbosity", "-1"]).is_err());
    }

    /// A config file is the base and flags refine it
    #[test]
    fn test_config_file_merge() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "verbosity": "error", "include_channels": ["net"], "exclude_channels": ["db"] }}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = parse(&["--log-config", &path, "--log-channels", "p2p"]);
        let options = cli.logging.to_options().unwrap();
        assert_eq!(options.verbosity, Severity::Error);
        assert!(options.include_channels.contains("net"));
        assert!(options.include_channels.contains("p2p"));
        assert!(options.exclude_channels.contains("db"));
        assert!(!options.vm_trace);

        let cli = parse(&["--log-config", &path, "-v", "3"]);
        assert_eq!(cli.logging.to_options().unwrap().verbosity, Severity::Debug);
    }
}
