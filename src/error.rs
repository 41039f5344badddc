//! Unified error types for smart75.
//!
//! Write-path precondition violations (bad rule sets, malformed dates) are
//! hard errors that leave existing state untouched. Infrastructure problems
//! on best-effort paths (remote mirroring, corrupt-record recovery) instead
//! follow a fail-open policy: log a warning and fall back to a safe default,
//! so a flaky mirror or a damaged record never locks the user out of their
//! challenge.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for smart75 operations.
#[derive(Error, Debug)]
pub enum Smart75Error {
    /// I/O errors from record file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The storage backend failed its startup capability probe.
    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Transition precondition violations (rule count, empty text, bad date).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Remote store unreachable or failing.
    #[error("remote error: {message}")]
    RemoteUnavailable { message: String },

    /// Migration found existing remote data; caller must decide.
    #[error("remote conflict: {message}")]
    RemoteConflict { message: String },
}

/// A specialized Result type for smart75 operations.
pub type Result<T> = std::result::Result<T, Smart75Error>;

impl Smart75Error {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a storage-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a remote-unavailable error.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Create a remote-conflict error.
    pub fn remote_conflict(message: impl Into<String>) -> Self {
        Self::RemoteConflict {
            message: message.into(),
        }
    }

    /// Check if this error is fatal for the session.
    ///
    /// Only a failed storage capability probe is fatal: no transitions may
    /// be attempted against a backend that cannot persist them. Everything
    /// else is either rejectable (validation) or recoverable (fail-open).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}

impl From<io::Error> for Smart75Error {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for Smart75Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Used on best-effort paths: log the error and return a safe default
/// instead of propagating a failure the user cannot act on.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

/// Exit codes for the smart75 CLI.
pub mod exit_codes {
    /// Command completed successfully.
    pub const SUCCESS: i32 = 0;

    /// Command failed (validation error, missing challenge, conflict).
    pub const FAILURE: i32 = 1;

    /// Storage capability probe failed; nothing was attempted.
    pub const STORAGE_UNAVAILABLE: i32 = 3;
}
