//! Building the index page from stored reports.

use std::fs;
use std::path::{Path, PathBuf};

use daybook_config::Project;
use daybook_html::{DaySection, EMPTY_PLACEHOLDER, IndexDocument, ProjectSection, render_index};
use tracing::{debug, info};

use crate::{CoreError, CoreResult, DayWindow, ReportStore};

/// Collects stored day reports into a single index page.
#[derive(Debug, Clone)]
pub struct IndexAggregator {
    store: ReportStore,
    title: String,
}

impl IndexAggregator {
    /// Creates a new aggregator reading from `store`.
    #[must_use]
    pub fn new(store: ReportStore, title: impl Into<String>) -> Self {
        Self {
            store,
            title: title.into(),
        }
    }

    /// Gathers every project's report for every day of the window.
    ///
    /// Days are most recent first and projects keep their given order. A
    /// missing report becomes the placeholder.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing report cannot be read.
    pub fn collect(&self, projects: &[Project], window: &DayWindow) -> CoreResult<IndexDocument> {
        let mut days = Vec::new();
        for day in window.days() {
            let mut sections = Vec::with_capacity(projects.len());
            for project in projects {
                let section = match self.store.read(&project.name, day)? {
                    Some(fragment) => ProjectSection {
                        name: project.name.clone(),
                        fragment,
                    },
                    None => {
                        debug!(project = %project.name, %day, "no report, using placeholder");
                        ProjectSection {
                            name: project.name.clone(),
                            fragment: EMPTY_PLACEHOLDER.to_string(),
                        }
                    }
                };
                sections.push(section);
            }
            days.push(DaySection {
                day,
                projects: sections,
            });
        }

        Ok(IndexDocument {
            title: self.title.clone(),
            days,
        })
    }

    /// Renders the index for the window and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if a report cannot be read or the index cannot be
    /// written.
    pub fn write(
        &self,
        projects: &[Project],
        window: &DayWindow,
        path: &Path,
    ) -> CoreResult<PathBuf> {
        let doc = self.collect(projects, window)?;
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| CoreError::Report {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, render_index(&doc)).map_err(|source| CoreError::Report {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), days = doc.days.len(), "wrote index");
        Ok(path.to_path_buf())
    }
}
