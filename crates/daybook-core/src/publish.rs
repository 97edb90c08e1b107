//! Committing and pushing working trees.

use std::fmt;
use std::path::Path;

use daybook_commit::short_hash;
use daybook_git::{GitError, Repository, Upstream};
use thiserror::Error;
use tracing::{error, info, warn};

/// Name reported for the report repository.
pub const REPORT_REPOSITORY: &str = "report";

/// What a successful publish did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new commit was created and pushed.
    Committed {
        /// Hash of the new commit.
        commit: String,
    },

    /// Nothing to commit, but existing local commits were pushed.
    PushedExisting,

    /// Nothing to commit and nothing to push.
    NoChanges,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed { commit } => {
                write!(f, "committed {}", short_hash(commit))
            }
            Self::PushedExisting => f.write_str("pushed existing commits"),
            Self::NoChanges => f.write_str("no changes"),
        }
    }
}

/// Why a publish failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// The path is not a git working tree.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// No remote to push to.
    #[error("no remote configured")]
    NoRemote,

    /// HEAD does not point at a branch.
    #[error("HEAD is detached")]
    DetachedHead,

    /// Fetching the upstream failed.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Local and upstream changes conflict.
    #[error("merge conflict with {0}")]
    MergeConflict(String),

    /// Integrating upstream changes failed for another reason.
    #[error("merge failed: {0}")]
    Merge(String),

    /// Staging the working tree failed.
    #[error("staging failed: {0}")]
    Stage(String),

    /// Creating the commit failed.
    #[error("commit failed: {0}")]
    Commit(String),

    /// Pushing failed or was rejected.
    #[error("push failed: {0}")]
    Push(String),
}

/// A failed publish of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{repository}: {reason}")]
pub struct PublishFailure {
    /// Project or repository name.
    pub repository: String,

    /// What went wrong.
    pub reason: FailureReason,
}

/// Result of publishing one repository.
pub type PublishResult = Result<PublishOutcome, PublishFailure>;

/// Commits and pushes working trees.
#[derive(Debug, Clone)]
pub struct Publisher {
    remote: String,
}

impl Publisher {
    /// Creates a publisher pushing branches without an upstream to `remote`.
    #[must_use]
    pub fn new(remote: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
        }
    }

    /// Publishes a project working tree.
    ///
    /// Upstream changes are fetched first. A branch that is only behind is
    /// fast-forwarded before staging. Local changes are then committed with
    /// `message`. A diverged branch is merged after that commit, and the
    /// result is pushed to the upstream branch, whatever its name. A
    /// conflicting merge leaves the branch at the local commit.
    pub fn publish_project(&self, name: &str, path: &Path, message: &str) -> PublishResult {
        let result = self.sync_and_push(path, message);
        report(name, result)
    }

    /// Publishes the report repository.
    ///
    /// Only changes under `include` are staged. No fetch or merge is
    /// attempted. A clean tree short-circuits to
    /// [`PublishOutcome::NoChanges`]. A branch without an upstream is
    /// pushed to the configured remote, or the first remote if that one is
    /// missing, and set to track it.
    pub fn publish_report<P: AsRef<Path>>(
        &self,
        path: &Path,
        include: &[P],
        message: &str,
    ) -> PublishResult {
        let result = self.commit_and_push(path, include, message);
        report(REPORT_REPOSITORY, result)
    }

    fn sync_and_push(&self, path: &Path, message: &str) -> Result<PublishOutcome, FailureReason> {
        let repo = open(path)?;
        let branch = branch_of(&repo)?;
        let upstream = repo.upstream(&branch).map_err(fetch_err)?;

        if let Some(upstream) = &upstream {
            repo.fetch(&upstream.remote).map_err(fetch_err)?;
            let status = repo.sync_status(upstream).map_err(fetch_err)?;
            if status.behind > 0 && status.ahead == 0 {
                repo.fast_forward(upstream).map_err(merge_err)?;
            }
        }

        repo.stage_all().map_err(stage_err)?;
        let committed = commit_pending(&repo, message)?;

        match upstream {
            Some(upstream) => {
                if !Self::integrate(&repo, &upstream)? {
                    return Ok(PublishOutcome::NoChanges);
                }
                repo.push_upstream(&branch, &upstream).map_err(push_err)?;
            }
            None => {
                if repo.head_oid().map_err(commit_err)?.is_none() {
                    return Ok(PublishOutcome::NoChanges);
                }
                let remotes = repo.remotes().map_err(push_err)?;
                if !remotes.iter().any(|r| r == &self.remote) {
                    return Err(FailureReason::NoRemote);
                }
                repo.push(&self.remote, &branch, true).map_err(push_err)?;
            }
        }

        Ok(outcome(committed))
    }

    /// Merges a diverged upstream. Returns whether there is anything to push.
    fn integrate(repo: &Repository, upstream: &Upstream) -> Result<bool, FailureReason> {
        let status = repo.sync_status(upstream).map_err(fetch_err)?;
        if status.behind > 0 {
            warn!(
                path = %repo.path().display(),
                ahead = status.ahead,
                behind = status.behind,
                remote = %upstream.remote,
                "branch diverged from upstream, merging"
            );
            repo.merge_upstream(upstream).map_err(merge_err)?;
        }
        let status = repo.sync_status(upstream).map_err(fetch_err)?;
        Ok(status.ahead > 0)
    }

    fn commit_and_push<P: AsRef<Path>>(
        &self,
        path: &Path,
        include: &[P],
        message: &str,
    ) -> Result<PublishOutcome, FailureReason> {
        let repo = open(path)?;
        let remotes = repo.remotes().map_err(push_err)?;
        if remotes.is_empty() {
            return Err(FailureReason::NoRemote);
        }
        let branch = branch_of(&repo)?;
        let upstream = repo.upstream(&branch).map_err(push_err)?;

        repo.stage_paths(include).map_err(stage_err)?;
        let committed = commit_pending(&repo, message)?;

        match upstream {
            Some(upstream) => {
                let Some(commit) = committed else {
                    return Ok(PublishOutcome::NoChanges);
                };
                repo.push_upstream(&branch, &upstream).map_err(push_err)?;
                Ok(PublishOutcome::Committed { commit })
            }
            None => {
                if repo.head_oid().map_err(commit_err)?.is_none() {
                    return Ok(PublishOutcome::NoChanges);
                }
                let remote = remotes
                    .iter()
                    .find(|r| *r == &self.remote)
                    .or_else(|| remotes.first())
                    .ok_or(FailureReason::NoRemote)?;
                repo.push(remote, &branch, true).map_err(push_err)?;
                Ok(outcome(committed))
            }
        }
    }
}

fn open(path: &Path) -> Result<Repository, FailureReason> {
    Repository::open(path).map_err(|e| FailureReason::NotARepository(e.to_string()))
}

fn branch_of(repo: &Repository) -> Result<String, FailureReason> {
    repo.current_branch().map_err(|e| match e {
        GitError::DetachedHead => FailureReason::DetachedHead,
        other => FailureReason::Stage(other.to_string()),
    })
}

/// Commits the index if it differs from HEAD.
fn commit_pending(repo: &Repository, message: &str) -> Result<Option<String>, FailureReason> {
    if !repo.has_staged_changes().map_err(stage_err)? {
        return Ok(None);
    }
    let oid = repo.commit_staged(message).map_err(commit_err)?;
    Ok(Some(oid.to_string()))
}

fn outcome(committed: Option<String>) -> PublishOutcome {
    match committed {
        Some(commit) => PublishOutcome::Committed { commit },
        None => PublishOutcome::PushedExisting,
    }
}

fn report(name: &str, result: Result<PublishOutcome, FailureReason>) -> PublishResult {
    match result {
        Ok(outcome) => {
            info!(repository = name, %outcome, "published");
            Ok(outcome)
        }
        Err(reason) => {
            error!(repository = name, %reason, "publish failed");
            Err(PublishFailure {
                repository: name.to_string(),
                reason,
            })
        }
    }
}

fn fetch_err(e: GitError) -> FailureReason {
    FailureReason::Fetch(e.to_string())
}

fn merge_err(e: GitError) -> FailureReason {
    match e {
        GitError::MergeConflict(reference) => FailureReason::MergeConflict(reference),
        other => FailureReason::Merge(other.to_string()),
    }
}

fn stage_err(e: GitError) -> FailureReason {
    FailureReason::Stage(e.to_string())
}

fn commit_err(e: GitError) -> FailureReason {
    FailureReason::Commit(e.to_string())
}

fn push_err(e: GitError) -> FailureReason {
    FailureReason::Push(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn configure(path: &Path) {
        let repo = git2::Repository::open(path).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }

    /// A bare `remote.git` and an empty working repository using it as `origin`.
    fn setup() -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let remote = temp_dir.path().join("remote.git");
        git2::Repository::init_bare(&remote).unwrap();

        let work = temp_dir.path().join("work");
        let repo = git2::Repository::init(&work).unwrap();
        repo.remote("origin", remote.to_str().unwrap()).unwrap();
        configure(&work);
        (temp_dir, work)
    }

    fn clone_remote(temp_dir: &TempDir, name: &str) -> std::path::PathBuf {
        let remote = temp_dir.path().join("remote.git");
        let path = temp_dir.path().join(name);
        git2::Repository::clone(remote.to_str().unwrap(), &path).unwrap();
        configure(&path);
        path
    }

    fn commit_file(path: &Path, file: &str, content: &str, message: &str) {
        fs::write(path.join(file), content).unwrap();
        let repo = Repository::open(path).unwrap();
        repo.stage_all().unwrap();
        repo.commit_staged(message).unwrap();
    }

    fn head_message(path: &Path) -> String {
        let repo = git2::Repository::open(path).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        head.message().unwrap().to_string()
    }

    fn head_oid(path: &Path) -> git2::Oid {
        let repo = git2::Repository::open(path).unwrap();
        repo.head().unwrap().target().unwrap()
    }

    /// Returns true if `file` is in the tree of `branch` on the bare remote.
    fn remote_has(temp_dir: &TempDir, branch: &str, file: &str) -> bool {
        let remote = git2::Repository::open_bare(temp_dir.path().join("remote.git")).unwrap();
        let oid = remote.refname_to_id(&format!("refs/heads/{branch}")).unwrap();
        let tree = remote.find_commit(oid).unwrap().tree().unwrap();
        tree.get_path(Path::new(file)).is_ok()
    }

    #[test]
    fn test_not_a_repository() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = Publisher::new("origin");

        let err = publisher
            .publish_project("backend", temp_dir.path(), "daily update")
            .unwrap_err();
        assert_eq!(err.repository, "backend");
        assert!(matches!(err.reason, FailureReason::NotARepository(_)));
    }

    #[test]
    fn test_report_without_remote() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        configure(temp_dir.path());
        fs::write(temp_dir.path().join("index.html"), "<html></html>").unwrap();

        let err = Publisher::new("origin")
            .publish_report(temp_dir.path(), &["index.html"], "Update report 2025-08-20")
            .unwrap_err();
        assert_eq!(err.repository, REPORT_REPOSITORY);
        assert_eq!(err.reason, FailureReason::NoRemote);
    }

    #[test]
    fn test_project_without_matching_remote() {
        let temp_dir = TempDir::new().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        configure(temp_dir.path());
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();

        let err = Publisher::new("origin")
            .publish_project("backend", temp_dir.path(), "daily update")
            .unwrap_err();
        assert_eq!(err.reason, FailureReason::NoRemote);
    }

    #[test]
    fn test_first_publish_sets_upstream_then_no_changes() {
        let (_temp_dir, work) = setup();
        fs::write(work.join("notes.txt"), "today\n").unwrap();
        let publisher = Publisher::new("origin");

        let first = publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();
        assert!(matches!(first, PublishOutcome::Committed { .. }));
        assert_eq!(head_message(&work), "daily update");

        let repo = Repository::open(&work).unwrap();
        let branch = repo.current_branch().unwrap();
        assert!(repo.upstream(&branch).unwrap().is_some());

        let second = publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();
        assert_eq!(second, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_pushes_existing_commits() {
        let (_temp_dir, work) = setup();
        commit_file(&work, "a.txt", "a", "local work");

        let outcome = Publisher::new("origin")
            .publish_project("backend", &work, "daily update")
            .unwrap();
        assert_eq!(outcome, PublishOutcome::PushedExisting);
        assert_eq!(head_message(&work), "local work");
    }

    #[test]
    fn test_behind_is_fast_forwarded_before_commit() {
        let (temp_dir, work) = setup();
        let publisher = Publisher::new("origin");
        commit_file(&work, "README.md", "hello\n", "initial");
        publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();

        let other = clone_remote(&temp_dir, "other");
        commit_file(&other, "NOTES.md", "from elsewhere\n", "remote change");
        Publisher::new("origin")
            .publish_project("backend", &other, "daily update")
            .unwrap();

        fs::write(work.join("report.html"), "<ul></ul>").unwrap();
        let outcome = publisher
            .publish_project("backend", &work, "add report")
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Committed { .. }));
        assert!(work.join("NOTES.md").exists());
        assert_eq!(head_message(&work), "add report");
    }

    #[test]
    fn test_diverged_conflict_keeps_local_commit() {
        let (temp_dir, work) = setup();
        let publisher = Publisher::new("origin");
        commit_file(&work, "README.md", "hello\n", "initial");
        publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();

        let other = clone_remote(&temp_dir, "other");
        commit_file(&other, "README.md", "theirs\n", "their change");
        publisher
            .publish_project("backend", &other, "daily update")
            .unwrap();

        commit_file(&work, "README.md", "ours\n", "our change");
        let err = publisher
            .publish_project("backend", &work, "daily update")
            .unwrap_err();

        assert!(matches!(err.reason, FailureReason::MergeConflict(_)));
        assert_eq!(head_message(&work), "our change");
        assert_eq!(fs::read_to_string(work.join("README.md")).unwrap(), "ours\n");
    }

    #[test]
    fn test_diverged_branch_is_merged_and_pushed() {
        let (temp_dir, work) = setup();
        let publisher = Publisher::new("origin");
        commit_file(&work, "README.md", "hello\n", "initial");
        publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();
        let branch = Repository::open(&work).unwrap().current_branch().unwrap();

        let other = clone_remote(&temp_dir, "other");
        commit_file(&other, "NOTES.md", "from elsewhere\n", "remote change");
        publisher
            .publish_project("backend", &other, "daily update")
            .unwrap();

        commit_file(&work, "local.md", "committed earlier\n", "local change");
        fs::write(work.join("report.html"), "<ul></ul>").unwrap();
        let outcome = publisher
            .publish_project("backend", &work, "add report")
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Committed { .. }));
        assert!(head_message(&work).starts_with("Merge "));
        for file in ["README.md", "NOTES.md", "local.md", "report.html"] {
            assert!(remote_has(&temp_dir, &branch, file), "{file} missing on remote");
        }

        let again = publisher
            .publish_project("backend", &work, "add report")
            .unwrap();
        assert_eq!(again, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_pushes_to_differently_named_upstream() {
        let (temp_dir, work) = setup();
        let publisher = Publisher::new("origin");
        commit_file(&work, "README.md", "hello\n", "initial");
        publisher
            .publish_project("backend", &work, "daily update")
            .unwrap();
        let branch = Repository::open(&work).unwrap().current_branch().unwrap();

        let repo = git2::Repository::open(&work).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        let mut local = repo.branch("work", &head, false).unwrap();
        local.set_upstream(Some(&format!("origin/{branch}"))).unwrap();
        repo.set_head("refs/heads/work").unwrap();

        fs::write(work.join("report.html"), "<ul></ul>").unwrap();
        let first = publisher
            .publish_project("backend", &work, "add report")
            .unwrap();
        assert!(matches!(first, PublishOutcome::Committed { .. }));

        let remote = git2::Repository::open_bare(temp_dir.path().join("remote.git")).unwrap();
        assert_eq!(
            remote.refname_to_id(&format!("refs/heads/{branch}")).unwrap(),
            head_oid(&work)
        );
        assert!(remote.find_reference("refs/heads/work").is_err());

        let second = publisher
            .publish_project("backend", &work, "add report")
            .unwrap();
        assert_eq!(second, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_report_stages_only_included_paths() {
        let (temp_dir, work) = setup();
        fs::create_dir_all(work.join("logs/backend")).unwrap();
        fs::write(work.join("logs/backend/2025-08-20.html"), "<ul></ul>").unwrap();
        fs::write(work.join("index.html"), "<html></html>").unwrap();
        fs::write(work.join("daybook.toml"), "[report]\n").unwrap();
        let include = [work.join("logs"), work.join("index.html")];
        let publisher = Publisher::new("origin");

        let first = publisher
            .publish_report(&work, &include, "Update report 2025-08-20")
            .unwrap();
        assert!(matches!(first, PublishOutcome::Committed { .. }));

        let branch = Repository::open(&work).unwrap().current_branch().unwrap();
        assert!(remote_has(&temp_dir, &branch, "logs/backend/2025-08-20.html"));
        assert!(remote_has(&temp_dir, &branch, "index.html"));
        assert!(!remote_has(&temp_dir, &branch, "daybook.toml"));

        let second = publisher
            .publish_report(&work, &include, "Update report 2025-08-20")
            .unwrap();
        assert_eq!(second, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_report_clean_tree_is_no_changes() {
        let (_temp_dir, work) = setup();
        let publisher = Publisher::new("origin");
        fs::write(work.join("index.html"), "<html></html>").unwrap();

        let first = publisher
            .publish_report(&work, &["index.html"], "Update report 2025-08-20")
            .unwrap();
        assert!(matches!(first, PublishOutcome::Committed { .. }));

        let second = publisher
            .publish_report(&work, &["index.html"], "Update report 2025-08-20")
            .unwrap();
        assert_eq!(second, PublishOutcome::NoChanges);
    }

    #[test]
    fn test_report_falls_back_to_first_remote() {
        let (_temp_dir, work) = setup();
        fs::write(work.join("index.html"), "<html></html>").unwrap();

        let outcome = Publisher::new("upstream")
            .publish_report(&work, &["index.html"], "Update report 2025-08-20")
            .unwrap();
        assert!(matches!(outcome, PublishOutcome::Committed { .. }));
    }

    #[test]
    fn test_failure_display() {
        let failure = PublishFailure {
            repository: "backend".to_string(),
            reason: FailureReason::NoRemote,
        };
        assert_eq!(failure.to_string(), "backend: no remote configured");
    }
}
