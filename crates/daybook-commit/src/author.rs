//! Author filtering.

use regex::Regex;

/// Restricts commits to a set of author names.
///
/// A name matches when it appears literally in `"<name> <<email>>"`, the
/// same identity string `git log --author` searches. Several names are
/// combined with logical OR.
#[derive(Debug, Clone, Default)]
pub struct AuthorFilter {
    pattern: Option<Regex>,
}

impl AuthorFilter {
    /// A filter that accepts every author.
    #[must_use]
    pub fn any() -> Self {
        Self { pattern: None }
    }

    /// A filter that accepts any of the given names.
    ///
    /// Blank names are ignored. With no usable names the filter accepts
    /// every author.
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternatives: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .map(|n| regex::escape(&n))
            .collect();

        if alternatives.is_empty() {
            return Self::any();
        }

        // Escaped literals joined by `|` always form a valid pattern.
        let pattern = Regex::new(&alternatives.join("|")).ok();
        Self { pattern }
    }

    /// Returns true if the filter accepts every author.
    #[must_use]
    pub fn is_any(&self) -> bool {
        self.pattern.is_none()
    }

    /// Returns true if the author passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str, email: &str) -> bool {
        match &self.pattern {
            None => true,
            Some(re) => re.is_match(&format!("{name} <{email}>")),
        }
    }
}
