//! Log command.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use daybook_core::CommitReader;

use super::{filter_authors, load_config};

/// Arguments for the log command.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// Project name from the configuration
    pub project: String,

    /// Day to show (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Print commits as JSON
    #[arg(long)]
    pub json: bool,

    /// Include commits from every author
    #[arg(long)]
    pub all_authors: bool,
}

/// Prints one project's commits for a day.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: LogArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let project = config
        .project(&args.project)
        .with_context(|| format!("unknown project: {}", args.project))?;
    let day = args.date.unwrap_or_else(|| Local::now().date_naive());

    let reader = CommitReader::from_config(&config, filter_authors(&config, args.all_authors));
    let commits = reader
        .read_project(project, day)
        .with_context(|| format!("failed to read commits of {}", project.name))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&commits)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("No commits on {day}");
        return Ok(());
    }

    for commit in &commits {
        println!(
            "{} {} {}: {}",
            commit.short_hash,
            commit.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            commit.author_name,
            commit.message
        );
    }
    Ok(())
}
