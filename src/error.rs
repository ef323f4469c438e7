//! Error types for airsweep operations.
//!
//! This module defines [`SweepError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SweepError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SweepError::Other`) for unexpected errors
//! - Discovery and removal never let a single failing target abort a batch;
//!   errors at that level are logged and iteration continues

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for airsweep operations.
#[derive(Debug, Error)]
pub enum SweepError {
    /// External command could not be launched or exited abnormally.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// External command exceeded its wall-clock budget.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimeout { command: String, seconds: u64 },

    /// Removal of an installation path failed.
    #[error("Failed to remove {path}: {message}")]
    RemovalFailed { path: PathBuf, message: String },

    /// A profile file could not be rewritten.
    #[error("Failed to clean {path}: {message}")]
    ProfileCleanupFailed { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for airsweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = SweepError::CommandFailed {
            command: "reg query HKLM".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("reg query HKLM"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn command_timeout_displays_budget() {
        let err = SweepError::CommandTimeout {
            command: "wmic product".into(),
            seconds: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("wmic product"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn removal_failed_displays_path_and_message() {
        let err = SweepError::RemovalFailed {
            path: PathBuf::from("/opt/python3.11"),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/python3.11"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn profile_cleanup_failed_displays_path() {
        let err = SweepError::ProfileCleanupFailed {
            path: PathBuf::from("/home/user/.bashrc"),
            message: "read-only filesystem".into(),
        };
        assert!(err.to_string().contains(".bashrc"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SweepError = io_err.into();
        assert!(matches!(err, SweepError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SweepError::RemovalFailed {
                path: PathBuf::from("/tmp/x"),
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
