//! Index command.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use daybook_core::{DayWindow, Orchestrator};

use super::{WindowArgs, load_config};

/// Arguments for the index command.
#[derive(Debug, Args)]
pub struct IndexArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Rebuilds the index page from the day reports on disk.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: IndexArgs, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let window = args.window.resolve(DayWindow::trailing(
        Local::now().date_naive(),
        config.report.days,
    ));

    let path = Orchestrator::new(&config, false)
        .build_index(&window)
        .context("failed to build index")?;

    println!("Wrote {} ({} days)", path.display(), window.len());
    Ok(())
}
