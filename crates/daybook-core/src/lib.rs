//! Core library for Daybook.
//!
//! This crate provides the report pipeline: reading commits for a day,
//! writing per-project day reports, aggregating them into the index page,
//! and publishing the results.

mod aggregate;
mod error;
mod message;
mod orchestrator;
mod publish;
mod reader;
mod store;
mod window;

pub use aggregate::IndexAggregator;
pub use error::{CoreError, CoreResult};
pub use message::{FixedMessage, MIN_MESSAGE_LEN, MessageProvider, validate_message};
pub use orchestrator::{Orchestrator, RunOptions, RunSummary, Stage};
pub use publish::{
    FailureReason, PublishFailure, PublishOutcome, PublishResult, Publisher, REPORT_REPOSITORY,
};
pub use reader::CommitReader;
pub use store::ReportStore;
pub use window::DayWindow;
