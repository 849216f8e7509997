//! Case-insensitive substring query with an optional exact tag filter.
//!
//! # Invariants
//! - Matching never reorders records; callers filter in collection order.
//! - An empty (or whitespace-only) query text matches every record.
//! - The tag filter is exact and case-sensitive.

use crate::model::record::Record;

/// Search options applied to one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// User query text.
    pub text: String,
    /// Optional exact tag membership filter.
    pub tag: Option<String>,
}

impl SearchQuery {
    /// Creates a query without a tag filter.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns whether `record` satisfies both the text and tag conditions.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let needle = self.text.trim().to_lowercase();
        if !record.search_text().to_lowercase().contains(needle.as_str()) {
            return false;
        }
        match self.tag.as_deref() {
            Some(tag) => record.tags().iter().any(|value| value == tag),
            None => true,
        }
    }

    /// Filters `records` in order.
    pub fn filter<R: Record>(&self, records: Vec<R>) -> Vec<R> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}
