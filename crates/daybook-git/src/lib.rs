//! Git abstraction layer for Daybook.
//!
//! This crate provides Git operations:
//! - Repository access
//! - Commit retrieval over a time window
//! - Staging, committing, and syncing with a remote

mod error;
mod repository;
mod sync;

pub use error::{GitError, GitResult};
pub use repository::Repository;
pub use sync::{SyncStatus, Upstream};
