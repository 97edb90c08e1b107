//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] daybook_git::GitError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] daybook_config::ConfigError),

    /// Commit message rejected before any work starts.
    #[error("commit message must be at least {min} characters")]
    MessageTooShort { min: usize },

    /// No commit message could be obtained.
    #[error("could not read commit message: {0}")]
    MessageUnavailable(String),

    /// A report file could not be read or written.
    #[error("failed to access report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
