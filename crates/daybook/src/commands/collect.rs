//! Collect command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use daybook_core::{DayWindow, Orchestrator};

use super::{WindowArgs, filter_authors, load_config};

/// Arguments for the collect command.
#[derive(Debug, Args)]
pub struct CollectArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Include commits from every author
    #[arg(long)]
    pub all_authors: bool,
}

/// Writes day reports without publishing.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: CollectArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let window = args.window.resolve(DayWindow::today());

    let orchestrator = Orchestrator::new(&config, filter_authors(&config, args.all_authors));
    let written = orchestrator
        .collect(&window)
        .context("failed to collect reports")?;

    for path in &written {
        println!("  {}", path.display());
    }
    println!("Wrote {} day reports", written.len());
    Ok(())
}
