//! Staging, committing, and syncing with a remote.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Cred, CredentialType, ErrorCode, FetchOptions, IndexAddOption, Oid, PushOptions,
    RemoteCallbacks, ResetType,
};
use tracing::{debug, info};

use crate::{GitError, GitResult, Repository};

/// Maximum credential attempts before giving up on a remote.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// The remote-tracking branch a local branch is configured to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    /// Remote name, e.g. `origin`.
    pub remote: String,

    /// Full reference name, e.g. `refs/remotes/origin/main`.
    pub reference: String,

    /// Branch on the remote that pushes go to, e.g. `refs/heads/main`.
    pub merge: String,
}

/// How a local branch relates to its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    /// Commits on the local branch missing upstream.
    pub ahead: usize,

    /// Commits on the upstream missing locally.
    pub behind: usize,
}

impl SyncStatus {
    /// Returns true if both sides carry commits the other lacks.
    #[must_use]
    pub fn diverged(&self) -> bool {
        self.ahead > 0 && self.behind > 0
    }
}

impl Repository {
    /// Returns the short name of the branch HEAD points at.
    ///
    /// Works for unborn branches too.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not symbolic.
    pub fn current_branch(&self) -> GitResult<String> {
        let head = self.inner.find_reference("HEAD")?;
        head.symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// Returns the commit HEAD points at, or `None` on an unborn branch.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved.
    pub fn head_oid(&self) -> GitResult<Option<Oid>> {
        match self.inner.head() {
            Ok(head) => Ok(head.target()),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the upstream of a local branch, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch configuration cannot be read.
    pub fn upstream(&self, branch: &str) -> GitResult<Option<Upstream>> {
        let refname = format!("refs/heads/{branch}");
        let remote = match self.inner.branch_upstream_remote(&refname) {
            Ok(buf) => buf.as_str().unwrap_or_default().to_string(),
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let reference = match self.inner.branch_upstream_name(&refname) {
            Ok(buf) => buf.as_str().unwrap_or_default().to_string(),
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let merge = match self.inner.branch_upstream_merge(&refname) {
            Ok(buf) => buf.as_str().unwrap_or_default().to_string(),
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if remote.is_empty() || reference.is_empty() || merge.is_empty() {
            return Ok(None);
        }
        Ok(Some(Upstream {
            remote,
            reference,
            merge,
        }))
    }

    /// Stages every change in the working tree, deletions included.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be updated.
    pub fn stage_all(&self) -> GitResult<()> {
        let mut index = self.inner.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;
        debug!(path = %self.path().display(), "staged all changes");
        Ok(())
    }

    /// Stages every change under `paths`, deletions included.
    ///
    /// Paths are absolute or relative to the working directory. Anything
    /// else in the working tree is left unstaged.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::OutsideWorkdir`] if a path lies outside the
    /// working directory, or an error if the index cannot be updated.
    pub fn stage_paths<P: AsRef<Path>>(&self, paths: &[P]) -> GitResult<()> {
        let specs = paths
            .iter()
            .map(|path| self.pathspec(path.as_ref()))
            .collect::<GitResult<Vec<_>>>()?;

        let mut index = self.inner.index()?;
        index.add_all(specs.iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(specs.iter(), None)?;
        index.write()?;
        debug!(path = %self.path().display(), ?specs, "staged paths");
        Ok(())
    }

    /// Turns a path into a pathspec relative to the working directory.
    fn pathspec(&self, path: &Path) -> GitResult<String> {
        let workdir = self.workdir();
        let relative = match path.strip_prefix(workdir) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) if path.is_relative() => path.to_path_buf(),
            Err(_) => resolve(path)?
                .strip_prefix(workdir.canonicalize()?)
                .map_err(|_| GitError::OutsideWorkdir(path.to_path_buf()))?
                .to_path_buf(),
        };

        let spec = relative.to_string_lossy().replace('\\', "/");
        if spec.is_empty() {
            Ok("*".to_string())
        } else {
            Ok(spec)
        }
    }

    /// Returns true if the index differs from the HEAD tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the index or HEAD cannot be read.
    pub fn has_staged_changes(&self) -> GitResult<bool> {
        let mut index = self.inner.index()?;
        let staged_tree = index.write_tree()?;
        match self.head_oid()? {
            Some(oid) => {
                let head_tree = self.inner.find_commit(oid)?.tree_id();
                Ok(head_tree != staged_tree)
            }
            None => Ok(!index.is_empty()),
        }
    }

    /// Commits the current index on top of HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if no signature is configured or the commit fails.
    pub fn commit_staged(&self, message: &str) -> GitResult<Oid> {
        let sig = self.inner.signature()?;
        let tree_id = self.inner.index()?.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let parent = match self.head_oid()? {
            Some(oid) => Some(self.inner.find_commit(oid)?),
            None => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        info!(path = %self.path().display(), commit = %oid, "created commit");
        Ok(oid)
    }

    /// Fetches a remote using its configured refspecs.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote is unknown or the fetch fails.
    pub fn fetch(&self, remote_name: &str) -> GitResult<()> {
        let mut remote = self
            .inner
            .find_remote(remote_name)
            .map_err(|_| GitError::RemoteNotFound(remote_name.to_string()))?;
        let config = self.inner.config()?;

        let mut opts = FetchOptions::new();
        opts.remote_callbacks(remote_callbacks(&config));
        remote.fetch::<&str>(&[], Some(&mut opts), None)?;

        debug!(remote = remote_name, "fetched");
        Ok(())
    }

    /// Compares HEAD with an upstream reference.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be resolved.
    pub fn sync_status(&self, upstream: &Upstream) -> GitResult<SyncStatus> {
        let remote_oid = self.inner.refname_to_id(&upstream.reference)?;
        let Some(local_oid) = self.head_oid()? else {
            return Ok(SyncStatus {
                ahead: 0,
                behind: 1,
            });
        };
        let (ahead, behind) = self.inner.graph_ahead_behind(local_oid, remote_oid)?;
        Ok(SyncStatus { ahead, behind })
    }

    /// Moves the current branch to the upstream commit.
    ///
    /// The target tree is checked out before the branch moves. Local
    /// modifications that would be overwritten make this fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout would lose local changes.
    pub fn fast_forward(&self, upstream: &Upstream) -> GitResult<()> {
        let branch = self.current_branch()?;
        let target = self.inner.refname_to_id(&upstream.reference)?;
        let refname = format!("refs/heads/{branch}");

        let commit = self.inner.find_commit(target)?;
        self.inner
            .checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;

        match self.inner.find_reference(&refname) {
            Ok(mut reference) => {
                reference.set_target(target, "daybook: fast-forward")?;
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                self.inner
                    .reference(&refname, target, true, "daybook: fast-forward")?;
            }
            Err(e) => return Err(e.into()),
        }
        self.inner.set_head(&refname)?;

        info!(path = %self.path().display(), %branch, to = %target, "fast-forwarded");
        Ok(())
    }

    /// Merges the upstream into the current branch with a merge commit.
    ///
    /// The working tree must be clean. On conflicts the merge is aborted,
    /// HEAD is restored, and [`GitError::MergeConflict`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge conflicts or cannot be committed.
    pub fn merge_upstream(&self, upstream: &Upstream) -> GitResult<Oid> {
        let reference = self.inner.find_reference(&upstream.reference)?;
        let theirs = self.inner.reference_to_annotated_commit(&reference)?;
        let head_oid = self
            .head_oid()?
            .ok_or_else(|| git2::Error::from_str("cannot merge into an unborn branch"))?;
        let ours = self.inner.find_commit(head_oid)?;

        self.inner.merge(&[&theirs], None, None)?;

        let mut index = self.inner.index()?;
        if index.has_conflicts() {
            self.inner.cleanup_state()?;
            self.inner.reset(ours.as_object(), ResetType::Hard, None)?;
            return Err(GitError::MergeConflict(upstream.reference.clone()));
        }

        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;
        let their_commit = self.inner.find_commit(theirs.id())?;
        let sig = self.inner.signature()?;
        let message = format!("Merge {} into {}", upstream.reference, self.current_branch()?);

        let oid = self.inner.commit(
            Some("HEAD"),
            &sig,
            &sig,
            &message,
            &tree,
            &[&ours, &their_commit],
        )?;
        self.inner.cleanup_state()?;

        info!(path = %self.path().display(), commit = %oid, "merged upstream");
        Ok(oid)
    }

    /// Pushes a local branch to the same name on a remote.
    ///
    /// With `set_upstream`, the branch is configured to track the pushed
    /// remote branch afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails or the remote rejects the update.
    pub fn push(&self, remote_name: &str, branch: &str, set_upstream: bool) -> GitResult<()> {
        self.push_refspec(remote_name, &format!("refs/heads/{branch}:refs/heads/{branch}"))?;

        if set_upstream {
            self.track(remote_name, branch)?;
        }

        info!(path = %self.path().display(), remote = remote_name, %branch, "pushed");
        Ok(())
    }

    /// Pushes a local branch to the remote branch it tracks.
    ///
    /// The remote branch may be named differently from `branch`.
    ///
    /// # Errors
    ///
    /// Returns an error if the push fails or the remote rejects the update.
    pub fn push_upstream(&self, branch: &str, upstream: &Upstream) -> GitResult<()> {
        let refspec = format!("refs/heads/{branch}:{}", upstream.merge);
        self.push_refspec(&upstream.remote, &refspec)?;

        info!(
            path = %self.path().display(),
            remote = %upstream.remote,
            %branch,
            to = %upstream.merge,
            "pushed"
        );
        Ok(())
    }

    fn push_refspec(&self, remote_name: &str, refspec: &str) -> GitResult<()> {
        let mut remote = self
            .inner
            .find_remote(remote_name)
            .map_err(|_| GitError::RemoteNotFound(remote_name.to_string()))?;
        let config = self.inner.config()?;

        let mut rejected: Option<String> = None;
        {
            let mut callbacks = remote_callbacks(&config);
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejected = Some(format!("{refname}: {message}"));
                }
                Ok(())
            });
            let mut opts = PushOptions::new();
            opts.remote_callbacks(callbacks);
            remote.push(&[refspec], Some(&mut opts))?;
        }
        match rejected {
            Some(reason) => Err(GitError::PushRejected(reason)),
            None => Ok(()),
        }
    }

    /// Configures `branch` to track `<remote>/<branch>`.
    fn track(&self, remote_name: &str, branch: &str) -> GitResult<()> {
        let tracking = format!("refs/remotes/{remote_name}/{branch}");
        if self.inner.find_reference(&tracking).is_err() {
            if let Some(oid) = self.head_oid()? {
                self.inner
                    .reference(&tracking, oid, true, "daybook: track pushed branch")?;
            }
        }

        let mut local = self.inner.find_branch(branch, BranchType::Local)?;
        local.set_upstream(Some(&format!("{remote_name}/{branch}")))?;
        debug!(%branch, remote = remote_name, "set upstream");
        Ok(())
    }
}

/// Canonicalizes a path that may not exist yet through its parent.
fn resolve(path: &Path) -> std::io::Result<PathBuf> {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !path.exists() => Ok(parent.canonicalize()?.join(name)),
        _ => path.canonicalize(),
    }
}

/// Callbacks answering credential requests from the SSH agent, the git
/// credential helper, or default credentials.
fn remote_callbacks(config: &git2::Config) -> RemoteCallbacks<'_> {
    let attempts = Cell::new(0usize);
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        if allowed.contains(CredentialType::SSH_KEY) {
            if let Some(user) = username {
                return Cred::ssh_key_from_agent(user);
            }
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return Cred::credential_helper(config, url, username);
        }
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username.unwrap_or("git"));
        }
        Cred::default()
    });
    callbacks
}
