//! Signal handling for graceful shutdown.
//!
//! This module provides centralized Ctrl+C / SIGTERM handling for fic. It
//! uses an `AtomicBool` flag shared between the signal handler and the
//! monitor loop.
//!
//! The monitor never cancels a cycle midway. It checks the flag before each
//! cycle and while sleeping between cycles ([`ShutdownHandler::sleep_until`]),
//! so it stops within one cycle boundary of the request. `fic update` checks
//! it between entries, so a database write always finishes and releases its
//! lock file.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fic::signal::install_handler;
//! use std::time::{Duration, Instant};
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//!
//! while !handler.is_shutdown_requested() {
//!     // ... one unit of work ...
//!     if !handler.sleep_until(Instant::now() + Duration::from_secs(60)) {
//!         break;
//!     }
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// How often a sleeping monitor re-checks the shutdown flag.
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Centralized shutdown handler for graceful application termination.
///
/// # Thread Safety
///
/// `ShutdownHandler` is `Send` and `Sync`, and the underlying flag uses
/// atomic operations for thread-safe access. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownHandler {
    /// The shared atomic flag indicating shutdown was requested.
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new shutdown handler with the flag initially set to `false`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    ///
    /// This is primarily useful for testing scenarios where you want to
    /// reuse a handler.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Sleep until `deadline` unless shutdown is requested first.
    ///
    /// Returns `true` if the deadline was reached, `false` if the sleep was
    /// cut short by a shutdown request. A deadline already in the past
    /// returns immediately.
    #[must_use]
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        loop {
            if self.is_shutdown_requested() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep((deadline - now).min(SHUTDOWN_POLL_INTERVAL));
        }
    }
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a handler that sets the shutdown flag on SIGINT, SIGTERM or SIGHUP.
///
/// This function should be called once, before the monitor loop starts. If a
/// handler is already installed in this process, the existing one is reset
/// and returned.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if the OS handler cannot be
/// registered and no handler was installed earlier.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        log::info!("Termination requested, stopping after the current step");
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            Ok(handler)
        }
        Err(e) => match GLOBAL_HANDLER.get() {
            Some(handler) => {
                handler.reset();
                Ok(handler.clone())
            }
            None => Err(SignalError::InstallFailed(e)),
        },
    }
}
