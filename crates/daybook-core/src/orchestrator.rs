//! The daily run: collect, publish projects, index, publish the report.

use std::fmt;
use std::path::PathBuf;

use daybook_config::Config;
use daybook_html::{FragmentRenderer, HtmlListRenderer};
use tracing::{debug, info, warn};

use crate::{
    CommitReader, CoreResult, DayWindow, IndexAggregator, MessageProvider, PublishResult,
    Publisher, ReportStore, validate_message,
};

/// Publishing stage of a run that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Publishing project working trees.
    PublishProjects,
    /// Publishing the report repository.
    PublishReport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PublishProjects => "publish projects",
            Self::PublishReport => "publish report",
        })
    }
}

/// What a run should do.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Days to collect reports for.
    pub window: DayWindow,

    /// Days shown in the index.
    pub index_window: DayWindow,

    /// Commit and push each project.
    pub publish_projects: bool,

    /// Commit and push the report repository.
    pub publish_report: bool,
}

impl RunOptions {
    /// Options collecting `window` with publishing taken from configuration.
    ///
    /// The index covers `report.days` days ending with the window, or the
    /// whole window if that is longer.
    #[must_use]
    pub fn from_config(config: &Config, window: DayWindow) -> Self {
        Self {
            window,
            index_window: DayWindow::trailing(window.end(), config.report.days.max(window.len())),
            publish_projects: config.publish.projects,
            publish_report: config.publish.report,
        }
    }

    /// Disables all publishing.
    #[must_use]
    pub fn without_publishing(mut self) -> Self {
        self.publish_projects = false;
        self.publish_report = false;
        self
    }
}

/// What a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Day reports written.
    pub reports: Vec<PathBuf>,

    /// Per-project publish results, in configuration order.
    pub projects: Vec<(String, PublishResult)>,

    /// Index page, if written.
    pub index: Option<PathBuf>,

    /// Report repository publish result, if attempted.
    pub report: Option<PublishResult>,

    /// The stage whose failure skipped the rest.
    pub failed_stage: Option<Stage>,
}

impl RunSummary {
    /// Returns true if no stage failed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failed_stage.is_none()
    }

    /// Names of projects whose publish failed.
    #[must_use]
    pub fn failed_projects(&self) -> Vec<&str> {
        self.projects
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Runs the report pipeline over the configured projects.
pub struct Orchestrator<'a> {
    config: &'a Config,
    reader: CommitReader,
    renderer: Box<dyn FragmentRenderer>,
    store: ReportStore,
    publisher: Publisher,
}

impl<'a> Orchestrator<'a> {
    /// Creates an orchestrator for `config`.
    ///
    /// Commits are restricted to the configured authors when
    /// `filter_authors` is set.
    #[must_use]
    pub fn new(config: &'a Config, filter_authors: bool) -> Self {
        Self {
            config,
            reader: CommitReader::from_config(config, filter_authors),
            renderer: Box::new(HtmlListRenderer::new()),
            store: ReportStore::new(&config.report.root),
            publisher: Publisher::new(&config.publish.remote),
        }
    }

    /// Returns the index page path.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.config.report.repository.join(&self.config.report.index)
    }

    /// Writes one report per project and day of the window.
    ///
    /// Stops at the first project that cannot be read or written.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository cannot be read or a report cannot
    /// be written.
    pub fn collect(&self, window: &DayWindow) -> CoreResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for day in window.days() {
            for project in &self.config.projects {
                let commits = self.reader.read_project(project, day)?;
                let fragment = self.renderer.render(&commits);
                let path = self.store.write(&project.name, day, &fragment)?;
                info!(
                    project = %project.name,
                    %day,
                    commits = commits.len(),
                    path = %path.display(),
                    "wrote report"
                );
                written.push(path);
            }
        }
        Ok(written)
    }

    /// Writes the index page covering `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if a report cannot be read or the index cannot be
    /// written.
    pub fn build_index(&self, window: &DayWindow) -> CoreResult<PathBuf> {
        let aggregator = IndexAggregator::new(self.store.clone(), &self.config.report.title);
        aggregator.write(&self.config.projects, window, &self.index_path())
    }

    /// Publishes every project with `message`, continuing past failures.
    #[must_use]
    pub fn publish_projects(&self, message: &str) -> Vec<(String, PublishResult)> {
        self.config
            .projects
            .iter()
            .map(|project| {
                let result = self
                    .publisher
                    .publish_project(&project.name, &project.path, message);
                (project.name.clone(), result)
            })
            .collect()
    }

    /// Publishes the report repository for the window ending on `window.end()`.
    ///
    /// Only the report root and the index page are committed.
    #[must_use]
    pub fn publish_report(&self, window: &DayWindow) -> PublishResult {
        let message = format!("Update report {}", window.end());
        let include = [self.config.report.root.clone(), self.index_path()];
        self.publisher
            .publish_report(&self.config.report.repository, &include, &message)
    }

    /// Runs every enabled stage in order.
    ///
    /// The commit message is obtained and checked before anything is
    /// written. Reports are always written. If any project fails to
    /// publish, the index and report repository are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit message is rejected or a report
    /// cannot be written. Publish failures are reported in the summary.
    pub fn run(
        &self,
        options: &RunOptions,
        messages: &mut dyn MessageProvider,
    ) -> CoreResult<RunSummary> {
        let message = if options.publish_projects {
            Some(validate_message(&messages.commit_message()?)?)
        } else {
            None
        };

        let mut summary = RunSummary {
            reports: self.collect(&options.window)?,
            ..RunSummary::default()
        };

        if let Some(message) = message {
            summary.projects = self.publish_projects(&message);
            let failed = summary.failed_projects();
            if !failed.is_empty() {
                warn!(?failed, "skipping index after publish failures");
                summary.failed_stage = Some(Stage::PublishProjects);
                return Ok(summary);
            }
        } else {
            debug!("project publishing disabled");
        }

        summary.index = Some(self.build_index(&options.index_window)?);

        if options.publish_report {
            let result = self.publish_report(&options.window);
            if result.is_err() {
                summary.failed_stage = Some(Stage::PublishReport);
            }
            summary.report = Some(result);
        }

        Ok(summary)
    }
}
