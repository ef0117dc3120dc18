//! Recent search history.

use serde::{Deserialize, Serialize};

/// A bounded, newest-first list of recent search terms.
///
/// Pushing a term moves it to the front if already present (duplicates are
/// collapsed) and evicts the oldest term past the capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches(Vec<String>);

impl RecentSearches {
    /// Maximum number of terms retained.
    pub const CAPACITY: usize = 5;

    /// An empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Rebuild from a stored list, applying the dedup and capacity rules
    /// oldest-to-newest so a malformed stored value normalizes.
    #[must_use]
    pub fn from_terms(terms: Vec<String>) -> Self {
        let mut history = Self::new();
        for term in terms.into_iter().rev() {
            history.push(&term);
        }
        history
    }

    /// Record a search term. Blank terms are ignored.
    pub fn push(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.0.retain(|existing| existing != term);
        self.0.insert(0, term.to_owned());
        self.0.truncate(Self::CAPACITY);
    }

    /// Terms, newest first.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.0
    }

    /// Consume and return the terms, newest first.
    #[must_use]
    pub fn into_terms(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_term_goes_first() {
        let mut history = RecentSearches::new();
        history.push("jacket");
        history.push("dress");
        assert_eq!(history.terms(), ["dress", "jacket"]);
    }

    #[test]
    fn duplicates_collapse_to_the_front() {
        let mut history = RecentSearches::new();
        history.push("jacket");
        history.push("dress");
        history.push("jacket");
        assert_eq!(history.terms(), ["jacket", "dress"]);
    }

    #[test]
    fn capacity_evicts_the_oldest() {
        let mut history = RecentSearches::new();
        for term in ["a", "b", "c", "d", "e", "f"] {
            history.push(term);
        }
        assert_eq!(history.terms(), ["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let mut history = RecentSearches::new();
        history.push("   ");
        history.push("");
        assert!(history.terms().is_empty());
    }

    #[test]
    fn from_terms_preserves_newest_first_order() {
        let history =
            RecentSearches::from_terms(vec!["newest".into(), "older".into(), "newest".into()]);
        assert_eq!(history.terms(), ["newest", "older"]);
    }
}
