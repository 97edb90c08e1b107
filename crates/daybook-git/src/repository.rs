//! Git repository wrapper.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use daybook_commit::{AuthorFilter, CommitRecord, LinkTemplate};
use git2::{ErrorCode, Repository as Git2Repo, Sort};
use tracing::debug;

use crate::{GitError, GitResult};

/// A Git repository wrapper.
pub struct Repository {
    pub(crate) inner: Git2Repo,
    path: PathBuf,
}

impl Repository {
    /// Opens a repository at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RepoNotFound`] if the path does not exist and
    /// [`GitError::NotARepo`] if it is not a Git repository.
    pub fn open(path: impl AsRef<Path>) -> GitResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GitError::RepoNotFound(path.to_path_buf()));
        }
        let inner = Git2Repo::open(path).map_err(|_| GitError::NotARepo(path.to_path_buf()))?;
        Ok(Self {
            inner,
            path: path.to_path_buf(),
        })
    }

    /// Returns the path the repository was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the working directory, or the git directory for bare repositories.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        self.inner.workdir().unwrap_or_else(|| self.inner.path())
    }

    /// Returns the commits authored within `[since, until]`, both ends inclusive.
    ///
    /// Commits are walked from HEAD newest first. Only commits whose author
    /// passes `authors` are kept. A repository without commits yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn commits_between(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
        authors: &AuthorFilter,
        links: &LinkTemplate,
    ) -> GitResult<Vec<CommitRecord>> {
        let mut revwalk = self.inner.revwalk()?;
        if let Err(e) = revwalk.push_head() {
            if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) {
                debug!(path = %self.path.display(), "repository has no commits yet");
                return Ok(Vec::new());
            }
            return Err(e.into());
        }
        revwalk.set_sorting(Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.inner.find_commit(oid)?;
            let author = commit.author();

            let Some(timestamp) = Utc.timestamp_opt(author.when().seconds(), 0).single() else {
                continue;
            };
            if timestamp < since || timestamp > until {
                continue;
            }

            let name = author.name().unwrap_or("Unknown");
            let email = author.email().unwrap_or("");
            if !authors.matches(name, email) {
                continue;
            }

            let hash = oid.to_string();
            let link = links.commit_url_for_path(&self.path, &hash);
            commits.push(CommitRecord::new(
                hash,
                commit.message().unwrap_or(""),
                name,
                email,
                timestamp,
                link,
            ));
        }

        debug!(
            path = %self.path.display(),
            count = commits.len(),
            %since,
            %until,
            "read commits"
        );
        Ok(commits)
    }

    /// Returns the names of the configured remotes.
    ///
    /// # Errors
    ///
    /// Returns an error if the remotes cannot be read.
    pub fn remotes(&self) -> GitResult<Vec<String>> {
        let remotes = self.inner.remotes()?;
        Ok(remotes.iter().flatten().map(String::from).collect())
    }
}
