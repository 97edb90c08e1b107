//! Commit links on the hosting service.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Builds `https://<host>/<org>/<repo>/commit/<hash>` links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplate {
    /// Hosting service, e.g. `github.com`.
    pub host: String,

    /// Organization or user owning the repositories.
    pub org: String,
}

impl LinkTemplate {
    /// Creates a new link template.
    #[must_use]
    pub fn new(host: impl Into<String>, org: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            org: org.into(),
        }
    }

    /// Returns the commit URL for a repository name.
    #[must_use]
    pub fn commit_url(&self, repo_name: &str, hash: &str) -> String {
        format!(
            "https://{}/{}/{repo_name}/commit/{hash}",
            self.host.trim_end_matches('/'),
            self.org.trim_matches('/'),
        )
    }

    /// Returns the commit URL for a working directory, using its base name
    /// as the repository name.
    #[must_use]
    pub fn commit_url_for_path(&self, path: &Path, hash: &str) -> String {
        self.commit_url(&repo_base_name(path), hash)
    }
}

impl Default for LinkTemplate {
    fn default() -> Self {
        Self::new("github.com", "evosist")
    }
}

/// Returns the last component of a repository path.
#[must_use]
pub fn repo_base_name(path: &Path) -> String {
    path.components()
        .next_back()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_url() {
        let links = LinkTemplate::new("github.com", "evosist");
        assert_eq!(
            links.commit_url("evosist_parking-backend", "abc123"),
            "https://github.com/evosist/evosist_parking-backend/commit/abc123"
        );
    }

    #[test]
    fn test_commit_url_trims_slashes() {
        let links = LinkTemplate::new("gitlab.example.com/", "/team/");
        assert_eq!(
            links.commit_url("api", "f00"),
            "https://gitlab.example.com/team/api/commit/f00"
        );
    }

    #[test]
    fn test_commit_url_for_path() {
        let links = LinkTemplate::default();
        let url = links.commit_url_for_path(Path::new("/work/github/frontend/"), "deadbeef");
        assert_eq!(url, "https://github.com/evosist/frontend/commit/deadbeef");
    }

    #[test]
    fn test_repo_base_name_relative() {
        assert_eq!(repo_base_name(Path::new("../backend")), "backend");
        assert_eq!(repo_base_name(Path::new("")), "");
    }
}
