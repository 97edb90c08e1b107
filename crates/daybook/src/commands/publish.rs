//! Publish command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use daybook_core::{
    DayWindow, FixedMessage, MessageProvider, Orchestrator, REPORT_REPOSITORY, validate_message,
};

use super::{load_config, print_publish};
use crate::prompt::StdinPrompt;

/// Arguments for the publish command.
#[derive(Debug, Args)]
pub struct PublishArgs {
    /// Only publish the report repository
    #[arg(long)]
    pub report_only: bool,

    /// Commit message for project commits (prompted if omitted)
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Publishes the projects, then the report repository.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: PublishArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let orchestrator = Orchestrator::new(&config, false);

    if !args.report_only {
        let raw = match &args.message {
            Some(message) => FixedMessage::new(message).commit_message(),
            None => StdinPrompt.commit_message(),
        }
        .context("failed to read commit message")?;
        let message = validate_message(&raw)?;

        println!("Projects:");
        let results = orchestrator.publish_projects(&message);
        for (name, result) in &results {
            print_publish(name, result);
        }

        let failed: Vec<&str> = results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(name, _)| name.as_str())
            .collect();
        if !failed.is_empty() {
            bail!(
                "publishing failed for: {}; report was not published",
                failed.join(", ")
            );
        }
    }

    println!("Report repository:");
    let result = orchestrator.publish_report(&DayWindow::today());
    print_publish(REPORT_REPOSITORY, &result);
    if result.is_err() {
        bail!("publishing the report repository failed");
    }
    Ok(())
}
