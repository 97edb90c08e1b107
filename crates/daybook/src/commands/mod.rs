//! Subcommand implementations.

pub mod collect;
pub mod index;
pub mod init;
pub mod log;
pub mod publish;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;
use daybook_config::{Config, find_and_load_config};
use daybook_core::{DayWindow, PublishResult};

/// Day selection shared by the reporting commands.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Report a single day (YYYY-MM-DD)
    #[arg(long, conflicts_with_all = ["today", "days"])]
    pub date: Option<NaiveDate>,

    /// Report today only
    #[arg(long, conflicts_with = "days")]
    pub today: bool,

    /// Report the trailing N days ending today
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,
}

impl WindowArgs {
    /// Returns the selected window, or `default` when no flag is given.
    pub fn resolve(&self, default: DayWindow) -> DayWindow {
        if let Some(date) = self.date {
            DayWindow::single(date)
        } else if self.today {
            DayWindow::today()
        } else if let Some(days) = self.days {
            DayWindow::trailing(Local::now().date_naive(), days)
        } else {
            default
        }
    }
}

/// Loads the configuration from `path`, or searches for it upward.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => daybook_config::load_config(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => find_and_load_config().context("failed to load configuration"),
    }
}

/// Whether reports are restricted to the configured authors.
pub fn filter_authors(config: &Config, all_authors: bool) -> bool {
    config.authors.filter && !all_authors
}

/// Prints one publish result.
pub fn print_publish(name: &str, result: &PublishResult) {
    match result {
        Ok(outcome) => println!("  {name}: {outcome}"),
        Err(failure) => eprintln!("  {name}: {}", failure.reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_args(date: Option<NaiveDate>, today: bool, days: Option<u32>) -> WindowArgs {
        WindowArgs { date, today, days }
    }

    #[test]
    fn test_resolve_date() {
        let day = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let window = window_args(Some(day), false, None).resolve(DayWindow::today());
        assert_eq!(window, DayWindow::single(day));
    }

    #[test]
    fn test_resolve_days() {
        let window = window_args(None, false, Some(3)).resolve(DayWindow::today());
        assert_eq!(window.len(), 3);
        assert_eq!(window.end(), Local::now().date_naive());
    }

    #[test]
    fn test_resolve_default() {
        let day = NaiveDate::from_ymd_opt(2025, 8, 20).unwrap();
        let default = DayWindow::trailing(day, 30);
        assert_eq!(window_args(None, false, None).resolve(default), default);
    }

    #[test]
    fn test_filter_authors() {
        let mut config = Config::default();
        assert!(!filter_authors(&config, false));
        config.authors.filter = true;
        assert!(filter_authors(&config, false));
        assert!(!filter_authors(&config, true));
    }
}
