//! Per-day commit fragments.

use chrono::{FixedOffset, Local};
use daybook_commit::CommitRecord;

use crate::Element;

/// Fragment written when a project has no commits for a day.
pub const EMPTY_PLACEHOLDER: &str = "<p><i>No commits today.</i></p>";

/// Renders one project's commits for one day.
pub trait FragmentRenderer {
    /// Renders the commits into an HTML fragment.
    ///
    /// An empty slice yields [`EMPTY_PLACEHOLDER`].
    fn render(&self, commits: &[CommitRecord]) -> String;
}

#[derive(Debug, Clone, Copy)]
enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// Renders commits as an HTML list, one entry per commit.
#[derive(Debug, Clone, Copy)]
pub struct HtmlListRenderer {
    zone: Zone,
}

impl HtmlListRenderer {
    /// Creates a renderer showing times in the local timezone.
    #[must_use]
    pub fn new() -> Self {
        Self { zone: Zone::Local }
    }

    /// Creates a renderer showing times at a fixed UTC offset.
    #[must_use]
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            zone: Zone::Fixed(offset),
        }
    }

    fn time_of(&self, commit: &CommitRecord) -> String {
        match self.zone {
            Zone::Local => commit.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            Zone::Fixed(offset) => commit.timestamp.with_timezone(&offset).format("%H:%M:%S"),
        }
        .to_string()
    }

    fn entry(&self, commit: &CommitRecord) -> Element {
        Element::new("li")
            .child(Element::new("strong").text(&commit.author_name))
            .raw(" &mdash; ")
            .text(&commit.message)
            .child(Element::void("br"))
            .child(
                Element::new("a")
                    .attr("href", &commit.link)
                    .attr("target", "_blank")
                    .text(&commit.short_hash),
            )
            .text(format!(" ({})", self.time_of(commit)))
    }
}

impl Default for HtmlListRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentRenderer for HtmlListRenderer {
    fn render(&self, commits: &[CommitRecord]) -> String {
        if commits.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }

        Element::block("ul")
            .children(commits.iter().map(|c| self.entry(c)))
            .render()
    }
}
