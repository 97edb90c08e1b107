//! Run command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use daybook_core::{DayWindow, FixedMessage, Orchestrator, RunOptions, RunSummary, Stage};

use super::{WindowArgs, filter_authors, load_config, print_publish};
use crate::prompt::StdinPrompt;

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Commit message for project commits (prompted if omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Only write reports and the index
    #[arg(long)]
    pub no_publish: bool,

    /// Include commits from every author
    #[arg(long)]
    pub all_authors: bool,
}

/// Runs the full pipeline.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RunArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let window = args.window.resolve(DayWindow::today());

    let mut options = RunOptions::from_config(&config, window);
    if args.no_publish {
        options = options.without_publishing();
    }

    let orchestrator = Orchestrator::new(&config, filter_authors(&config, args.all_authors));
    let summary = match &args.message {
        Some(message) => orchestrator.run(&options, &mut FixedMessage::new(message)),
        None => orchestrator.run(&options, &mut StdinPrompt),
    }
    .context("run failed")?;

    print_summary(&summary);

    match summary.failed_stage {
        Some(Stage::PublishProjects) => bail!(
            "publishing failed for: {}; index and report were not published",
            summary.failed_projects().join(", ")
        ),
        Some(Stage::PublishReport) => bail!("publishing the report repository failed"),
        None => Ok(()),
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Wrote {} day reports", summary.reports.len());

    if !summary.projects.is_empty() {
        println!("Projects:");
        for (name, result) in &summary.projects {
            print_publish(name, result);
        }
    }

    if let Some(index) = &summary.index {
        println!("Wrote {}", index.display());
    }

    if let Some(result) = &summary.report {
        println!("Report repository:");
        print_publish(daybook_core::REPORT_REPOSITORY, result);
    }
}
