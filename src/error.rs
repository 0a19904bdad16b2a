//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the fic application.
///
/// - 0: Success
/// - 1: General error (configuration, bootstrap, database failure)
/// - 2: Changes detected (`monitor --once` only)
/// - 130: `update` stopped early by Ctrl+C or SIGTERM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed.
    Success = 0,
    /// General error: an unexpected or fatal error occurred.
    GeneralError = 1,
    /// Changes detected: a single comparison found modified, new or deleted files.
    ChangesDetected = 2,
    /// Interrupted: an update was stopped by a termination request.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FIC000",
            Self::GeneralError => "FIC001",
            Self::ChangesDetected => "FIC002",
            Self::Interrupted => "FIC130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FIC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
