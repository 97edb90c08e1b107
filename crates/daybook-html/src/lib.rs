//! HTML rendering for Daybook.
//!
//! This crate turns commits into report markup:
//! - [`Element`]: A small builder for escaped HTML
//! - [`FragmentRenderer`]: Renders one project's commits for one day
//! - [`render_index`]: Renders the tabbed multi-day index page

mod assets;
mod element;
mod fragment;
mod index;

pub use element::{Element, escape};
pub use fragment::{EMPTY_PLACEHOLDER, FragmentRenderer, HtmlListRenderer};
pub use index::{DaySection, IndexDocument, ProjectSection, day_id, render_index, section_id};
