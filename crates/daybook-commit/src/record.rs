//! Commit record as shown in a day report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters kept in a short hash.
pub const SHORT_HASH_LEN: usize = 7;

/// A commit read from a project's history, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The full commit hash (SHA).
    pub hash: String,

    /// The first 7 characters of the hash.
    pub short_hash: String,

    /// The commit summary (first line of the message).
    pub message: String,

    /// The author timestamp.
    pub timestamp: DateTime<Utc>,

    /// The author name.
    pub author_name: String,

    /// The author email.
    pub author_email: String,

    /// Link to the commit on the hosting service.
    pub link: String,
}

impl CommitRecord {
    /// Creates a new commit record.
    ///
    /// The short hash is derived from `hash` and the message is reduced
    /// to its first line.
    #[must_use]
    pub fn new(
        hash: impl Into<String>,
        message: &str,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
        link: impl Into<String>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = short_hash(&hash).to_string();
        Self {
            hash,
            short_hash,
            message: message.lines().next().unwrap_or("").trim_end().to_string(),
            timestamp,
            author_name: author_name.into(),
            author_email: author_email.into(),
            link: link.into(),
        }
    }
}

/// Returns the first 7 characters of a hash, or the whole hash when shorter.
#[must_use]
pub fn short_hash(hash: &str) -> &str {
    hash.char_indices()
        .nth(SHORT_HASH_LEN)
        .map_or(hash, |(idx, _)| &hash[..idx])
}
