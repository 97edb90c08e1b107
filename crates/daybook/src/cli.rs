//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Daily git commit reports with an HTML dashboard.
#[derive(Debug, Parser)]
#[command(name = "daybook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: search upward for daybook.toml)
    #[arg(short, long, global = true, env = "DAYBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a starter daybook.toml
    Init(commands::init::InitArgs),

    /// Collect reports, publish projects, rebuild the index, publish the report
    Run(commands::run::RunArgs),

    /// Write day reports only
    Collect(commands::collect::CollectArgs),

    /// Rebuild the index page from existing day reports
    Index(commands::index::IndexArgs),

    /// Print one project's commits for a day
    Log(commands::log::LogArgs),

    /// Commit and push projects and the report repository
    Publish(commands::publish::PublishArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Init(args) => commands::init::run(args, config),
            Commands::Run(args) => commands::run::run(args, config),
            Commands::Collect(args) => commands::collect::run(args, config),
            Commands::Index(args) => commands::index::run(args, config),
            Commands::Log(args) => commands::log::run(args, config),
            Commands::Publish(args) => commands::publish::run(args, config),
        }
    }
}
