//! Initialize command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use daybook_config::{CONFIG_FILE_NAME, Config};
use tracing::info;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Runs the init command.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: InitArgs, config: Option<&Path>) -> Result<()> {
    let path = config.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), Path::to_path_buf);

    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let content = Config::starter()
        .to_toml()
        .context("failed to serialize starter configuration")?;
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "wrote starter configuration");
    println!("Created {}", path.display());
    println!("Edit the [[projects]] entries, then run `daybook run`.");
    Ok(())
}
