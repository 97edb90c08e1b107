//! Reading a project's commits for a day.

use chrono::NaiveDate;
use daybook_commit::{AuthorFilter, CommitRecord, LinkTemplate};
use daybook_config::{Config, Project};
use daybook_git::Repository;
use tracing::debug;

use crate::{CoreResult, DayWindow};

/// Reads commits authored on a given local calendar day.
#[derive(Debug, Clone)]
pub struct CommitReader {
    links: LinkTemplate,
    authors: AuthorFilter,
}

impl CommitReader {
    /// Creates a new reader.
    #[must_use]
    pub fn new(links: LinkTemplate, authors: AuthorFilter) -> Self {
        Self { links, authors }
    }

    /// Creates a reader from configuration.
    ///
    /// The configured author names only restrict results when
    /// `filter_authors` is set.
    #[must_use]
    pub fn from_config(config: &Config, filter_authors: bool) -> Self {
        let links = LinkTemplate::new(&config.links.host, &config.links.org);
        let authors = if filter_authors {
            AuthorFilter::names(&config.authors.names)
        } else {
            AuthorFilter::any()
        };
        Self::new(links, authors)
    }

    /// Returns the commits of `repo` authored on `day`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn read_day(&self, repo: &Repository, day: NaiveDate) -> CoreResult<Vec<CommitRecord>> {
        let (since, until) = DayWindow::bounds(day);
        let commits = repo.commits_between(since, until, &self.authors, &self.links)?;
        debug!(path = %repo.path().display(), %day, count = commits.len(), "read day");
        Ok(commits)
    }

    /// Opens the project's repository and reads its commits for `day`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project path is not a repository.
    pub fn read_project(&self, project: &Project, day: NaiveDate) -> CoreResult<Vec<CommitRecord>> {
        let repo = Repository::open(&project.path)?;
        self.read_day(&repo, day)
    }
}
