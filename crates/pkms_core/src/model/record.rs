//! Shared record identity, provenance and validation.
//!
//! # Responsibility
//! - Define the `Record` contract implemented by `Note` and `Task`.
//! - Own id generation and `updated_at` refresh rules.
//!
//! # Invariants
//! - Generated ids are UUID v4 strings and are never reused.
//! - Ids read from disk are kept verbatim, whatever their format.
//! - `refreshed_timestamp` is strictly greater than its input.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque stable identifier of one record inside its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Note,
    Task,
}

impl RecordKind {
    /// Backing file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Note => "notes.json",
            Self::Task => "tasks.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Task => "task",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Provenance of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// Entered by the user.
    #[default]
    Manual,
    /// Derived from agent helper output.
    Agent,
}

impl RecordSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Agent => "agent",
        }
    }
}

impl Display for RecordSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure for record writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle(RecordKind),
    /// A tag value is empty or whitespace only.
    BlankTag(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle(kind) => write!(f, "{kind} title cannot be empty"),
            Self::BlankTag(value) => write!(f, "invalid tag: `{value}`"),
        }
    }
}

impl Error for RecordValidationError {}

/// Contract shared by every persisted record type.
///
/// The store is generic over this trait, so each collection gets the same
/// load/mutate/persist cycle.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Collection this record type lives in.
    const KIND: RecordKind;

    /// Optional-field change set accepted by `apply_patch`.
    type Patch;

    fn id(&self) -> &RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    fn updated_at(&self) -> DateTime<Utc>;

    /// Tags used by exact-membership search filters.
    fn tags(&self) -> &[String];

    /// Text searched by substring queries, fields joined by single spaces.
    fn search_text(&self) -> String;

    /// Checks field-level write rules for a new record.
    fn validate(&self) -> Result<(), RecordValidationError>;

    /// Checks write rules for the fields `patch` sets; absent fields are not checked.
    fn validate_patch(patch: &Self::Patch) -> Result<(), RecordValidationError>;

    /// Applies present patch fields and refreshes `updated_at`.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Returns the next `updated_at` value after `previous`.
///
/// Wall clock is used when it moved forward; otherwise the previous value is
/// bumped by one microsecond.
pub fn refreshed_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Resolves timestamps read from disk so that `updated_at >= created_at`.
///
/// A missing value borrows the other one; both missing means "now".
pub(crate) fn stored_timestamps(
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    match (created_at, updated_at) {
        (Some(created), Some(updated)) => (created, updated.max(created)),
        (Some(created), None) => (created, created),
        (None, Some(updated)) => (updated, updated),
        (None, None) => {
            let now = Utc::now();
            (now, now)
        }
    }
}

pub(crate) fn validate_title(kind: RecordKind, title: &str) -> Result<(), RecordValidationError> {
    if title.trim().is_empty() {
        return Err(RecordValidationError::EmptyTitle(kind));
    }
    Ok(())
}

pub(crate) fn validate_tags(tags: &[String]) -> Result<(), RecordValidationError> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(RecordValidationError::BlankTag(tag.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{refreshed_timestamp, stored_timestamps, RecordId, RecordKind, RecordSource};
    use chrono::{Duration, Utc};

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }

    #[test]
    fn refreshed_timestamp_moves_past_future_previous_value() {
        let future = Utc::now() + Duration::seconds(60);
        let next = refreshed_timestamp(future);
        assert!(next > future);
    }

    #[test]
    fn record_source_serializes_lowercase() {
        let json = serde_json::to_string(&RecordSource::Agent).unwrap();
        assert_eq!(json, "\"agent\"");
    }

    #[test]
    fn kinds_map_to_sibling_files() {
        assert_eq!(RecordKind::Note.file_name(), "notes.json");
        assert_eq!(RecordKind::Task.file_name(), "tasks.json");
    }

    #[test]
    fn stored_timestamps_fill_missing_side_from_the_other() {
        let earlier = Utc::now() - Duration::days(2);
        let later = earlier + Duration::hours(1);

        assert_eq!(stored_timestamps(None, Some(earlier)), (earlier, earlier));
        assert_eq!(stored_timestamps(Some(earlier), None), (earlier, earlier));
        assert_eq!(stored_timestamps(Some(earlier), Some(later)), (earlier, later));
        assert_eq!(stored_timestamps(Some(later), Some(earlier)), (later, later));

        let (created, updated) = stored_timestamps(None, None);
        assert_eq!(created, updated);
    }
}
