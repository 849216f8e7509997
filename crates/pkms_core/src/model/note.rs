//! Note record and its update patch.

use crate::model::record::{
    refreshed_timestamp, stored_timestamps, validate_tags, validate_title, Record, RecordId,
    RecordKind, RecordSource, RecordValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text note with ordered tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredNote")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub body: String,
    /// Kept in entry order; membership checks are exact.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source: RecordSource,
}

/// On-disk note shape; every field but `id` may be missing.
#[derive(Deserialize)]
struct StoredNote {
    id: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: RecordSource,
}

impl From<StoredNote> for Note {
    fn from(stored: StoredNote) -> Self {
        let (created_at, updated_at) = stored_timestamps(stored.created_at, stored.updated_at);
        Self {
            id: stored.id,
            title: stored.title,
            body: stored.body,
            tags: stored.tags,
            created_at,
            updated_at,
            source: stored.source,
        }
    }
}

impl Note {
    /// Creates a note with a generated id and matching timestamps.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        source: RecordSource,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            title: title.into(),
            body: body.into(),
            tags,
            created_at: now,
            updated_at: now,
            source,
        }
    }
}

/// Partial note update. `None` leaves a field unchanged.
///
/// Deserializing from JSON ignores unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.tags.is_none()
    }
}

impl Record for Note {
    const KIND: RecordKind = RecordKind::Note;
    type Patch = NotePatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn search_text(&self) -> String {
        let tags = self.tags.join(" ");
        [self.title.as_str(), self.body.as_str(), tags.as_str()].join(" ")
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        validate_title(RecordKind::Note, &self.title)?;
        validate_tags(&self.tags)
    }

    fn validate_patch(patch: &NotePatch) -> Result<(), RecordValidationError> {
        if let Some(title) = &patch.title {
            validate_title(RecordKind::Note, title)?;
        }
        match &patch.tags {
            Some(tags) => validate_tags(tags),
            None => Ok(()),
        }
    }

    fn apply_patch(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_at = refreshed_timestamp(self.updated_at);
    }
}
