//! Process exit codes and machine-readable error reports.

use serde::Serialize;

/// Exit codes for the dupescan binary.
///
/// - 0: Scan completed, whether or not duplicates were found
/// - 1: General error (bad config, I/O failure, strict-mode abort)
/// - 2: The directory to scan does not exist or is not a directory
/// - 3: Scan completed but some entries could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed without per-entry errors.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The scan root was rejected before scanning.
    InvalidRoot = 2,
    /// Scan completed but some entries were skipped.
    PartialSuccess = 3,
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
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::InvalidRoot => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }

    /// Whether the process should report success to the shell.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Error report printed on stderr when `--output json` is active.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a structured report from an error and its exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }

    /// Create a structured report from a plain message.
    #[must_use]
    pub fn from_message(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: message.into(),
        }
    }
}
