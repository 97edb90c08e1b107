//! Git error types.

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found.
    #[error("repository not found at {0}")]
    RepoNotFound(std::path::PathBuf),

    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(std::path::PathBuf),

    /// Remote not configured.
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// HEAD does not point at a branch.
    #[error("HEAD is detached")]
    DetachedHead,

    /// Merging the upstream left conflicts.
    #[error("merge conflict with {0}")]
    MergeConflict(String),

    /// A path to stage is not inside the working directory.
    #[error("path is outside the working directory: {0}")]
    OutsideWorkdir(std::path::PathBuf),

    /// The remote refused a pushed reference.
    #[error("push rejected: {0}")]
    PushRejected(String),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
