//! Logging infrastructure for fic.
//!
//! Two layers live here:
//!
//! 1. [`init_logging`] sets up the process-wide `log` facade with an
//!    `env_logger` backend, optionally writing to the configured log file.
//! 2. [`LogSink`] is the handle the core components (scanner, store, monitor,
//!    update) actually write through. Production code passes a [`LogFacade`],
//!    which forwards to the `log` macros; tests pass a [`MemorySink`] and
//!    assert on the recorded lines.
//!
//! Log levels for the facade are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! # Example
//!
//! ```rust,no_run
//! use fic::logging::{init_logging, LogFacade, LogSink};
//!
//! init_logging(0, false, None).expect("logger");
//!
//! let sink = LogFacade;
//! sink.info("Starting fic monitor daemon");
//! ```

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Prefix written at the start of every log line.
pub const LOG_PREFIX: &str = "FIC";

/// Target of every line emitted through [`LogFacade`].
pub const LOG_TARGET: &str = "fic";

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// This function should be called once at the start of the application,
/// before any logging calls are made.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
/// * `log_file` - Append log lines to this file instead of stderr
///
/// # Errors
///
/// Returns an error if the log file's parent directory cannot be created or
/// the file cannot be opened for appending. This is a bootstrap failure and
/// callers should treat it as fatal.
///
/// # Panics
///
/// This function will panic if called more than once, as `env_logger`
/// can only be initialized once per process.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> io::Result<()> {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();

    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(Target::Pipe(Box::new(file)));
        // Colors only make sense on a terminal.
        builder.write_style(env_logger::WriteStyle::Never);
    }

    configure_format(&mut builder, verbose);
    builder.init();

    log::debug!(
        "Logging initialized at level: {}",
        current_level_name()
    );
    Ok(())
}

/// Open the log file for appending, creating its parent directory if needed.
fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Determine the log level from CLI flags.
///
/// # Arguments
///
/// * `verbose` - Verbosity count (0=info, 1=debug, 2+=trace)
/// * `quiet` - If true, use error level
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Configure the log line format.
///
/// Every line carries the `FIC` prefix, a timestamp and the level. At `-v`
/// and above the log target is included as well, except for lines emitted
/// through a [`LogSink`], whose target says nothing about their origin.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let level_style = buf.default_level_style(level);

        let source = if verbose >= 1 {
            source_column(record.target())
        } else {
            None
        };

        if let Some(source) = source {
            writeln!(
                buf,
                "{LOG_PREFIX}: {} {level_style}{:<5}{level_style:#} [{}] {}",
                timestamp,
                level,
                source,
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{LOG_PREFIX}: {} {level_style}{:<5}{level_style:#} {}",
                timestamp,
                level,
                record.args()
            )
        }
    });
}

/// The `[source]` column for a record target, if worth printing.
fn source_column(target: &str) -> Option<&str> {
    (target != LOG_TARGET).then_some(target)
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

/// Destination for the log lines emitted by the change-detection core.
///
/// Components receive a sink explicitly instead of reaching for a global
/// logger, so a test can hand them a [`MemorySink`] and inspect the output.
pub trait LogSink: Send + Sync {
    /// Emit one line at the given level.
    fn emit(&self, level: Level, message: &str);

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }
}

/// Sink that forwards every line to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl LogSink for LogFacade {
    fn emit(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    /// Recorded messages at exactly the given level.
    #[must_use]
    pub fn lines_at(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Whether any recorded line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|(_, line)| line.contains(needle))
    }

    /// Number of recorded lines containing `needle`.
    #[must_use]
    pub fn count(&self, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|(_, line)| line.contains(needle))
            .count()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A poisoned sink still holds valid lines.
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }
}
