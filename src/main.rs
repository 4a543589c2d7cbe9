//! # chanlog - Demo Entry Point
//!
//! Installs process-wide logging from command-line flags and exercises it
//! from several named threads:
//!
//! 1. **Parse arguments**: logging flags plus worker/record counts
//! 2. **Initialize logging**: `setup_logging` with the resolved options
//! 3. **Emit records**: each worker logs on a few channels, with and without
//!    prefix/suffix decorations
//!
//! Try `chanlog -v 3 --log-exclude-channels sync` or
//! `chanlog --log-channels p2p --log-vmtrace -v 4`.

use anyhow::{Context, Result};
use chanlog::{cli::Cli, is_vm_trace_enabled, set_thread_name, setup_logging};
use clap::Parser;
use std::thread;
use tracing::{debug, error, info, trace, warn};

const CHANNELS: [&str; 3] = ["p2p", "sync", "net"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = cli
        .logging
        .to_options()
        .context("failed to resolve logging options")?;
    setup_logging(&options).context("failed to install logging")?;
    set_thread_name("main");

    info!(target: "main", "chanlog {} starting {} workers", chanlog::VERSION, cli.workers);
    debug!(target: "main", "options: {:?}", options);
    if is_vm_trace_enabled() {
        trace!(target: "vm", "VM tracing enabled");
    }

    let workers = (0..cli.workers)
        .map(|index| {
            let records = cli.records;
            thread::Builder::new()
                .name(format!("w{index}"))
                .spawn(move || run_worker(index, records))
                .with_context(|| format!("failed to spawn worker {index}"))
        })
        .collect::<Result<Vec<_>>>()?;

    for worker in workers {
        if worker.join().is_err() {
            error!(target: "main", "worker panicked");
        }
    }

    info!(target: "main", suffix = "(done)", "all workers finished");
    Ok(())
}

/// Emit `records` records across the demo channels.
fn run_worker(index: usize, records: usize) {
    set_thread_name(&format!("w{index}"));

    for seq in 0..records {
        match CHANNELS[seq % CHANNELS.len()] {
            "p2p" => info!(target: "p2p", prefix = %format!("peer#{seq}"), "handshake complete"),
            "sync" => debug!(target: "sync", block = seq * 100, "imported block"),
            _ => warn!(target: "net", suffix = "(will retry)", "connection reset"),
        }
        trace!(target: "vm", "worker {} step {}", index, seq);
    }
}
