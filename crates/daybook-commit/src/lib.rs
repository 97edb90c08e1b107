//! Commit types for Daybook.
//!
//! This crate provides the types shared by the reader and the renderers:
//! - [`CommitRecord`]: A commit as shown in a day report
//! - [`LinkTemplate`]: Builds links to a commit on the hosting service
//! - [`AuthorFilter`]: Restricts commits to a set of author names

mod author;
mod link;
mod record;

pub use author::AuthorFilter;
pub use link::LinkTemplate;
pub use record::{CommitRecord, SHORT_HASH_LEN, short_hash};
