//! Commit messages for published changes.

use crate::{CoreError, CoreResult};

/// Minimum length of a commit message after trimming.
pub const MIN_MESSAGE_LEN: usize = 5;

/// Supplies the commit message used when publishing projects.
pub trait MessageProvider {
    /// Returns the raw commit message.
    ///
    /// # Errors
    ///
    /// Returns an error if no message can be obtained.
    fn commit_message(&mut self) -> CoreResult<String>;
}

/// A message known up front, e.g. from a command-line flag.
#[derive(Debug, Clone)]
pub struct FixedMessage(String);

impl FixedMessage {
    /// Creates a new fixed message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl MessageProvider for FixedMessage {
    fn commit_message(&mut self) -> CoreResult<String> {
        Ok(self.0.clone())
    }
}

/// Trims the message and checks its length.
///
/// # Errors
///
/// Returns [`CoreError::MessageTooShort`] if fewer than
/// [`MIN_MESSAGE_LEN`] characters remain.
pub fn validate_message(raw: &str) -> CoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_MESSAGE_LEN {
        return Err(CoreError::MessageTooShort {
            min: MIN_MESSAGE_LEN,
        });
    }
    Ok(trimmed.to_string())
}
