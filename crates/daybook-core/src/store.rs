//! Day report files.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use crate::{CoreError, CoreResult};

/// Stores one fragment per project and day under a root directory.
///
/// Reports live at `<root>/<project>/<YYYY-MM-DD>.html`.
#[derive(Debug, Clone)]
pub struct ReportStore {
    root: PathBuf,
}

impl ReportStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the report path for a project and day.
    #[must_use]
    pub fn path_for(&self, project: &str, day: NaiveDate) -> PathBuf {
        self.root.join(project).join(format!("{day}.html"))
    }

    /// Writes a report, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write(&self, project: &str, day: NaiveDate, fragment: &str) -> CoreResult<PathBuf> {
        let path = self.path_for(project, day);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| CoreError::Report {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, fragment).map_err(|source| CoreError::Report {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote report");
        Ok(path)
    }

    /// Reads a report, or `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn read(&self, project: &str, day: NaiveDate) -> CoreResult<Option<String>> {
        let path = self.path_for(project, day);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CoreError::Report { path, source }),
        }
    }
}
