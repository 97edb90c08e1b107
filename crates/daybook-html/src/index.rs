//! Multi-day index page.

use chrono::NaiveDate;

use crate::Element;
use crate::assets::{SCRIPT, STYLE};

/// The aggregate view over every project and day in a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    /// Page title prefix.
    pub title: String,

    /// Days, most recent first.
    pub days: Vec<DaySection>,
}

/// All project fragments for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    /// The calendar day.
    pub day: NaiveDate,

    /// Project fragments in configuration order.
    pub projects: Vec<ProjectSection>,
}

/// One project's fragment for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSection {
    /// Project name.
    pub name: String,

    /// Rendered fragment, or the placeholder when no report exists.
    pub fragment: String,
}

impl IndexDocument {
    /// Returns the full page title, suffixed with the most recent day.
    #[must_use]
    pub fn heading(&self) -> String {
        match self.days.first() {
            Some(first) => format!("{} - {}", self.title, first.day),
            None => self.title.clone(),
        }
    }
}

/// Returns the element id of a day tab panel.
#[must_use]
pub fn day_id(day: NaiveDate) -> String {
    format!("day-{day}")
}

/// Returns the element id of a project section within a day.
///
/// `position` is the project's index in configuration order. It keeps ids
/// unique when two names slug to the same text.
#[must_use]
pub fn section_id(day: NaiveDate, position: usize, project: &str) -> String {
    let slug: String = project
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}-{position}-{slug}", day_id(day))
}

/// Renders the index page.
///
/// The first day's tab and sections start active and open. Tab switching
/// and section toggling are done client-side by element id.
#[must_use]
pub fn render_index(doc: &IndexDocument) -> String {
    let heading = doc.heading();

    let head = Element::block("head")
        .child(Element::void("meta").attr("charset", "UTF-8"))
        .child(
            Element::void("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(Element::new("title").text(&heading))
        .child(Element::new("style").raw(STYLE));

    let tabs = Element::block("nav").class("tabs").children(
        doc.days.iter().enumerate().map(|(i, section)| {
            Element::new("button")
                .class(if i == 0 { "tab active" } else { "tab" })
                .attr("data-tab", day_id(section.day))
                .text(section.day.to_string())
        }),
    );

    let panels = doc
        .days
        .iter()
        .enumerate()
        .map(|(i, section)| day_panel(section, i == 0));

    let body = Element::block("body")
        .child(Element::new("h1").text(&heading))
        .child(tabs)
        .children(panels)
        .child(Element::new("script").raw(SCRIPT));

    let html = Element::block("html")
        .attr("lang", "en")
        .child(head)
        .child(body);

    format!("<!DOCTYPE html>\n{html}\n")
}

fn day_panel(section: &DaySection, active: bool) -> Element {
    let projects = section.projects.iter().enumerate().map(|(i, project)| {
        let id = section_id(section.day, i, &project.name);
        Element::block("section")
            .class(if active { "project open" } else { "project" })
            .id(&id)
            .child(
                Element::new("button")
                    .class("project-toggle")
                    .attr("data-target", &id)
                    .text(project.name.to_uppercase()),
            )
            .child(
                Element::block("div")
                    .class("project-body")
                    .raw(&project.fragment),
            )
    });

    Element::block("div")
        .class(if active { "tab-panel active" } else { "tab-panel" })
        .id(day_id(section.day))
        .children(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EMPTY_PLACEHOLDER;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn section(name: &str, fragment: &str) -> ProjectSection {
        ProjectSection {
            name: name.to_string(),
            fragment: fragment.to_string(),
        }
    }

    fn sample() -> IndexDocument {
        IndexDocument {
            title: "Team Commit Report".to_string(),
            days: vec![
                DaySection {
                    day: day(22),
                    projects: vec![section("frontend", EMPTY_PLACEHOLDER)],
                },
                DaySection {
                    day: day(21),
                    projects: vec![section("frontend", "<ul>\n<li>real</li>\n</ul>")],
                },
            ],
        }
    }

    #[test]
    fn test_heading() {
        assert_eq!(sample().heading(), "Team Commit Report - 2025-08-22");

        let empty = IndexDocument {
            title: "Report".to_string(),
            days: Vec::new(),
        };
        assert_eq!(empty.heading(), "Report");
    }

    #[test]
    fn test_section_id_slugs_names() {
        assert_eq!(section_id(day(20), 0, "backend"), "day-2025-08-20-0-backend");
        assert_eq!(section_id(day(20), 1, "web app"), "day-2025-08-20-1-web-app");
    }

    #[test]
    fn test_section_ids_unique_when_slugs_collide() {
        let doc = IndexDocument {
            title: "Report".to_string(),
            days: vec![DaySection {
                day: day(20),
                projects: vec![
                    section("web app", EMPTY_PLACEHOLDER),
                    section("web-app", EMPTY_PLACEHOLDER),
                ],
            }],
        };
        let html = render_index(&doc);

        assert_eq!(html.matches(r#"id="day-2025-08-20-0-web-app""#).count(), 1);
        assert_eq!(html.matches(r#"id="day-2025-08-20-1-web-app""#).count(), 1);
        assert!(html.contains(r#"data-target="day-2025-08-20-1-web-app">WEB-APP</button>"#));
    }

    #[test]
    fn test_render_index_structure() {
        let html = render_index(&sample());

        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Team Commit Report - 2025-08-22</title>"));
        assert_eq!(html.matches("class=\"tab active\"").count(), 1);
        assert_eq!(html.matches("class=\"tab\"").count(), 1);
        assert!(html.contains(r#"<button class="tab active" data-tab="day-2025-08-22">2025-08-22</button>"#));
        assert!(html.contains(r#"<div class="tab-panel active" id="day-2025-08-22">"#));
        assert!(html.contains(r#"<div class="tab-panel" id="day-2025-08-21">"#));
        assert!(html.contains(r#"<section class="project open" id="day-2025-08-22-0-frontend">"#));
        assert!(html.contains(r#"<section class="project" id="day-2025-08-21-0-frontend">"#));
        assert!(html.contains(r#"data-target="day-2025-08-22-0-frontend">FRONTEND</button>"#));
        assert!(html.contains("<li>real</li>"));
        assert!(html.contains("<script>"));
    }

    #[test]
    fn test_render_index_days_most_recent_first() {
        let html = render_index(&sample());
        let newer = html.find("id=\"day-2025-08-22\"").unwrap();
        let older = html.find("id=\"day-2025-08-21\"").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn test_render_index_is_deterministic() {
        assert_eq!(render_index(&sample()), render_index(&sample()));
    }
}
