//! fic - File Integrity Checker
//!
//! Detects changes to a set of monitored paths by content hash. A baseline
//! of SHA-256 fingerprints is kept in a JSON database; `fic update` refreshes
//! it and `fic monitor` periodically compares a fresh scan against it,
//! logging every file as matched, modified, new or deleted.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod scanner;
pub mod signal;
pub mod store;

use anyhow::{Context, Result};
use clap::CommandFactory;
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use crate::commands::{run_update_until, Monitor, MonitorSettings};
use crate::config::Config;
use crate::error::ExitCode;
use crate::logging::{LogFacade, LogSink};
use crate::scanner::Hasher;
use crate::store::HashStore;

/// Run the application for parsed command-line arguments.
///
/// Bootstrap order: load configuration, initialize logging, create the
/// baseline database if absent. A failure in any of these is fatal.
///
/// # Errors
///
/// Returns an error for bootstrap failures and for store failures that abort
/// a one-shot command.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::Success);
    };

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Commands::Monitor(args) = &command {
        if let Some(interval) = args.interval {
            config.interval_secs = interval;
        }
    }

    logging::init_logging(cli.verbose, cli.quiet, config.log_file())
        .context("Failed to initialize logger")?;

    let sink: Arc<dyn LogSink> = Arc::new(LogFacade);
    bootstrap_database(&config, sink.as_ref())?;

    match command {
        Commands::Init => Ok(ExitCode::Success),
        Commands::Update => {
            let shutdown = signal::install_handler()?;
            let mut store = HashStore::new(&config.database_path);
            let summary = run_update_until(
                &mut store,
                &config.scan_paths,
                &Hasher::new(),
                sink.as_ref(),
                &shutdown,
            )
            .context("Failed to update baseline")?;
            Ok(if summary.interrupted {
                ExitCode::Interrupted
            } else {
                ExitCode::Success
            })
        }
        Commands::Monitor(args) => {
            let shutdown = signal::install_handler()?;
            let monitor = Monitor::new(MonitorSettings::from(&config), sink, shutdown);
            if args.once {
                let report = monitor.run_once().context("Monitor cycle failed")?;
                return Ok(if report.diff.has_changes() {
                    ExitCode::ChangesDetected
                } else {
                    ExitCode::Success
                });
            }
            monitor.run();
            Ok(ExitCode::Success)
        }
    }
}

/// Create the baseline database unless it already exists.
fn bootstrap_database(config: &Config, sink: &dyn LogSink) -> Result<()> {
    let created = HashStore::create_if_absent(&config.database_path).with_context(|| {
        format!(
            "Failed to create base database at {}",
            config.database_path.display()
        )
    })?;
    if created {
        sink.info(&format!(
            "Database created successfully at {}",
            config.database_path.display()
        ));
    }
    Ok(())
}
