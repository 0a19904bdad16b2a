//! Command-line interface definitions for fic.
//!
//! # Example
//!
//! ```bash
//! # Record the current state of the configured paths as the baseline
//! fic update
//!
//! # Watch for changes, one cycle per minute
//! fic monitor
//!
//! # Single comparison, exit code 2 if anything changed
//! fic monitor --once
//!
//! # Use a specific config file with debug logging
//! fic -v --config /etc/fic/config.json monitor
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// File integrity checker.
///
/// fic records SHA-256 fingerprints of the files under the configured scan
/// paths and periodically reports files that were modified, added or deleted.
#[derive(Debug, Parser)]
#[command(name = "fic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "PATH", global = true, env = "FIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for fic.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Hash the immediate entries of each scan path into the baseline
    Update,
    /// Periodically compare the scan paths against the baseline
    Monitor(MonitorArgs),
    /// Create an empty baseline database if none exists
    Init,
}

/// Arguments for the monitor subcommand.
#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Seconds between cycle starts (overrides the configuration)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}
