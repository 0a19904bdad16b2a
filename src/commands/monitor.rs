//! The monitor loop.
//!
//! Each cycle scans the configured paths, writes the scan to the snapshot
//! scratch file, loads the baseline and logs the comparison. Cycles start a
//! fixed interval apart, measured from the start of the previous cycle; an
//! overrunning cycle is followed immediately by the next one.
//!
//! The loop only reads the baseline. Accepting changes is an explicit
//! `fic update`.
//!
//! ```text
//! Idle -> Scanning -> Comparing -> Sleeping -> Scanning -> ... -> Stopped
//! ```
//!
//! Shutdown is observed at the top of each cycle and during the sleep; a
//! cycle in progress always runs to completion.

use std::cell::Cell;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::diff::{compare, DiffReport};
use crate::logging::LogSink;
use crate::scanner::{Hasher, ScanStats, Scanner};
use crate::signal::ShutdownHandler;
use crate::store::{write_snapshot, HashStore, StoreResult};

/// Inputs of the monitor loop.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Baseline database location
    pub database_path: PathBuf,
    /// Roots scanned every cycle, in order
    pub scan_paths: Vec<PathBuf>,
    /// Scratch file receiving each cycle's scan
    pub snapshot_path: PathBuf,
    /// Time between cycle starts
    pub interval: Duration,
}

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        Self {
            database_path: config.database_path.clone(),
            scan_paths: config.scan_paths.clone(),
            snapshot_path: config.snapshot_path.clone(),
            interval: config.interval(),
        }
    }
}

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Scanning,
    Comparing,
    Sleeping,
    Stopped,
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Comparing => "comparing",
            Self::Sleeping => "sleeping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Outcome of one completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub scan: ScanStats,
    pub diff: DiffReport,
    /// Whether the scratch snapshot was written
    pub snapshot_written: bool,
    pub elapsed: Duration,
}

/// Totals over a whole [`Monitor::run`].
#[derive(Debug, Clone, Default)]
pub struct MonitorSummary {
    /// Cycles started, including failed ones
    pub cycles: usize,
    /// Cycles aborted by a baseline error
    pub failed_cycles: usize,
    /// Diff of the most recent successful cycle
    pub last_report: Option<DiffReport>,
}

/// Periodic scan-and-compare driver.
pub struct Monitor {
    settings: MonitorSettings,
    sink: Arc<dyn LogSink>,
    shutdown: ShutdownHandler,
    hasher: Hasher,
    state: Cell<MonitorState>,
}

impl Monitor {
    #[must_use]
    pub fn new(settings: MonitorSettings, sink: Arc<dyn LogSink>, shutdown: ShutdownHandler) -> Self {
        Self {
            settings,
            sink,
            shutdown,
            hasher: Hasher::new(),
            state: Cell::new(MonitorState::Idle),
        }
    }

    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state.get()
    }

    #[must_use]
    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run cycles until shutdown is requested.
    ///
    /// A failed cycle is logged and the loop carries on with the next one.
    pub fn run(&self) -> MonitorSummary {
        self.sink.info("Starting fic monitor daemon...");
        let mut summary = MonitorSummary::default();

        while !self.shutdown.is_shutdown_requested() {
            let started = Instant::now();
            summary.cycles += 1;

            match self.run_cycle() {
                Ok(report) => summary.last_report = Some(report.diff),
                Err(e) => {
                    summary.failed_cycles += 1;
                    self.sink
                        .error(&format!("Monitor cycle aborted, baseline unavailable: {e}"));
                }
            }
            self.sink.info(&format!(
                "Monitor cycle completed in {:?}",
                started.elapsed()
            ));

            self.transition(MonitorState::Sleeping);
            if !self
                .shutdown
                .sleep_until(next_cycle_start(started, self.settings.interval))
            {
                break;
            }
        }

        self.transition(MonitorState::Stopped);
        self.sink.info("Received termination request, exiting");
        summary
    }

    /// Run exactly one cycle, logging its duration.
    ///
    /// # Errors
    ///
    /// Returns the store error if the baseline could not be loaded.
    pub fn run_once(&self) -> StoreResult<CycleReport> {
        let result = self.run_cycle();
        self.transition(MonitorState::Idle);
        match &result {
            Ok(report) => self.sink.info(&format!(
                "Monitor cycle completed in {:?}",
                report.elapsed
            )),
            Err(e) => self
                .sink
                .error(&format!("Monitor cycle aborted, baseline unavailable: {e}")),
        }
        result
    }

    /// Scan, write the scratch snapshot, then compare against the baseline.
    ///
    /// # Errors
    ///
    /// Returns the store error if the baseline could not be loaded. A failure
    /// to write the scratch snapshot is only logged.
    pub fn run_cycle(&self) -> StoreResult<CycleReport> {
        let started = Instant::now();

        self.transition(MonitorState::Scanning);
        let (snapshot, scan) = Scanner::new(self.sink.as_ref())
            .with_hasher(self.hasher.clone())
            .scan(&self.settings.scan_paths);

        let snapshot_written = match write_snapshot(&snapshot, &self.settings.snapshot_path) {
            Ok(()) => {
                self.sink.info(&format!(
                    "Temporary database created successfully at {}",
                    self.settings.snapshot_path.display()
                ));
                true
            }
            Err(e) => {
                self.sink
                    .error(&format!("Error creating temporary database: {e}"));
                false
            }
        };

        self.transition(MonitorState::Comparing);
        self.sink.info("Comparing scan against baseline...");
        let baseline = HashStore::open(&self.settings.database_path)?;
        let diff = compare(&snapshot, baseline.entries());
        diff.log_to(self.sink.as_ref());

        Ok(CycleReport {
            scan,
            diff,
            snapshot_written,
            elapsed: started.elapsed(),
        })
    }

    fn transition(&self, next: MonitorState) {
        let previous = self.state.replace(next);
        if previous != next {
            self.sink
                .debug(&format!("Monitor state: {previous} -> {next}"));
        }
    }
}

/// When the cycle after one started at `started` may begin.
///
/// Measured from the cycle start, so a cycle that overran the interval is
/// due immediately.
fn next_cycle_start(started: Instant, interval: Duration) -> Instant {
    started + interval
}
