//! Configuration schema.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Report output configuration.
    #[serde(default)]
    pub report: ReportConfig,

    /// Commit link configuration.
    #[serde(default)]
    pub links: LinksConfig,

    /// Author filter configuration.
    #[serde(default)]
    pub authors: AuthorsConfig,

    /// Publishing configuration.
    #[serde(default)]
    pub publish: PublishConfig,

    /// Projects whose history is reported.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A project whose commits are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Identifier used for report directories and index sections.
    pub name: String,

    /// Path to the project's git working directory.
    pub path: PathBuf,
}

impl Project {
    /// Creates a new project.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving `<project>/<day>.html` files.
    #[serde(default = "default_report_root")]
    pub root: PathBuf,

    /// Report repository holding the index page.
    #[serde(default = "default_report_repository")]
    pub repository: PathBuf,

    /// Index file name inside the report repository.
    #[serde(default = "default_index")]
    pub index: String,

    /// Title prefix of the index page.
    #[serde(default = "default_title")]
    pub title: String,

    /// Number of trailing days covered by default.
    #[serde(default = "default_days")]
    pub days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            root: default_report_root(),
            repository: default_report_repository(),
            index: default_index(),
            title: default_title(),
            days: default_days(),
        }
    }
}

fn default_report_root() -> PathBuf {
    PathBuf::from("logs")
}

fn default_report_repository() -> PathBuf {
    PathBuf::from(".")
}

fn default_index() -> String {
    "index.html".to_string()
}

fn default_title() -> String {
    "Team Commit Report".to_string()
}

fn default_days() -> u32 {
    30
}

/// Commit link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Hosting service.
    #[serde(default = "default_host")]
    pub host: String,

    /// Organization owning the repositories.
    #[serde(default = "default_org")]
    pub org: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            org: default_org(),
        }
    }
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_org() -> String {
    "evosist".to_string()
}

/// Author filter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorsConfig {
    /// Recognized author names.
    #[serde(default)]
    pub names: Vec<String>,

    /// Restrict reports to the recognized authors.
    #[serde(default)]
    pub filter: bool,
}

/// Publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Commit and push each project's working tree.
    #[serde(default = "default_true")]
    pub projects: bool,

    /// Commit and push the report repository.
    #[serde(default = "default_true")]
    pub report: bool,

    /// Remote to push to.
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            projects: true,
            report: true,
            remote: default_remote(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Config {
    /// Returns a starter configuration with one example project.
    #[must_use]
    pub fn starter() -> Self {
        Self {
            authors: AuthorsConfig {
                names: vec!["your-name".to_string()],
                filter: false,
            },
            projects: vec![Project::new("backend", "../backend")],
            ..Self::default()
        }
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Looks up a project by name.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Resolves relative paths against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.report.root);
        resolve(&mut self.report.repository);
        for project in &mut self.projects {
            resolve(&mut project.path);
        }
    }

    /// Checks values that would make report paths ambiguous.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on empty or duplicate project names,
    /// names containing path separators, or a zero-day window.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.report.days == 0 {
            return Err(ConfigError::Invalid(
                "report.days must be at least 1".to_string(),
            ));
        }
        if self.report.index.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "report.index must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            let name = project.name.as_str();
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("project name is empty".to_string()));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::Invalid(format!(
                    "project name is not a plain identifier: {name}"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate project name: {name}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.root, PathBuf::from("logs"));
        assert_eq!(config.report.repository, PathBuf::from("."));
        assert_eq!(config.report.index, "index.html");
        assert_eq!(config.report.days, 30);
        assert_eq!(config.links.host, "github.com");
        assert_eq!(config.publish.remote, "origin");
        assert!(config.publish.projects);
        assert!(config.publish.report);
        assert!(!config.authors.filter);
        assert!(config.projects.is_empty());
    }

    #[test]
    fn test_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.report.days, 30);
        assert!(config.publish.projects);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            [report]
            root = "out/logs"
            repository = "out"
            index = "dashboard.html"
            title = "Daily Commits"
            days = 7

            [links]
            host = "gitlab.com"
            org = "parking"

            [authors]
            names = ["mohammad", "evosist-bot"]
            filter = true

            [publish]
            projects = false
            remote = "upstream"

            [[projects]]
            name = "backend"
            path = "D:/Github/evosist_parking-backend"

            [[projects]]
            name = "frontend"
            path = "../frontend"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.report.root, PathBuf::from("out/logs"));
        assert_eq!(config.report.index, "dashboard.html");
        assert_eq!(config.report.title, "Daily Commits");
        assert_eq!(config.report.days, 7);
        assert_eq!(config.links.org, "parking");
        assert_eq!(config.authors.names.len(), 2);
        assert!(config.authors.filter);
        assert!(!config.publish.projects);
        assert!(config.publish.report); // default
        assert_eq!(config.publish.remote, "upstream");
        assert_eq!(config.projects.len(), 2);
        assert_eq!(config.project("frontend").unwrap().path, PathBuf::from("../frontend"));
        assert!(config.project("mobile").is_none());
    }

    #[test]
    fn test_project_requires_path() {
        let toml = r#"
            [[projects]]
            name = "backend"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = Config::default();
        config.projects.push(Project::new("backend", "../backend"));
        config.projects.push(Project::new("abs", "/srv/abs"));

        config.resolve_paths(Path::new("/home/team/reports"));

        assert_eq!(config.report.root, PathBuf::from("/home/team/reports/logs"));
        assert_eq!(config.report.repository, PathBuf::from("/home/team/reports/."));
        assert_eq!(
            config.projects[0].path,
            PathBuf::from("/home/team/reports/../backend")
        );
        assert_eq!(config.projects[1].path, PathBuf::from("/srv/abs"));
    }

    #[test]
    fn test_validate_ok() {
        assert!(Config::starter().validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut config = Config::default();
        config.projects.push(Project::new("backend", "a"));
        config.projects.push(Project::new("backend", "b"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate project name"));
    }

    #[test]
    fn test_validate_path_like_names() {
        for name in ["", "a/b", "..", "a\\b"] {
            let mut config = Config::default();
            config.projects.push(Project::new(name, "p"));
            assert!(config.validate().is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_validate_zero_days() {
        let mut config = Config::default();
        config.report.days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_starter_round_trip() {
        let toml_str = Config::starter().to_toml().unwrap();
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[[projects]]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.projects, Config::starter().projects);
    }
}
