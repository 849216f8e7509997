//! Task record, status lifecycle and update patch.
//!
//! # Invariants
//! - New tasks start at `TaskStatus::Todo`.
//! - `due_date` is caller-supplied text and is never parsed.

use crate::model::record::{
    refreshed_timestamp, stored_timestamps, validate_title, Record, RecordId, RecordKind,
    RecordSource, RecordValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed.
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value.trim())
            .ok_or_else(|| {
                format!("unsupported task status `{value}`; expected todo|in-progress|done")
            })
    }
}

/// Actionable item with an optional free-text due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredTask")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub due_date: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source: RecordSource,
}

#[derive(Deserialize)]
struct StoredTask {
    id: RecordId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    status: TaskStatus,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    source: RecordSource,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        let (created_at, updated_at) = stored_timestamps(stored.created_at, stored.updated_at);
        Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            due_date: stored.due_date,
            status: stored.status,
            created_at,
            updated_at,
            source: stored.source,
        }
    }
}

impl Task {
    /// Creates a `todo` task with a generated id and matching timestamps.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<String>,
        source: RecordSource,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            title: title.into(),
            description: description.into(),
            due_date,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
            source,
        }
    }
}

/// Partial task update. `None` leaves a field unchanged.
///
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "present_field")]
    pub due_date: Option<Option<String>>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that only moves the task to `done`.
    pub fn complete() -> Self {
        Self {
            status: Some(TaskStatus::Done),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

impl Record for Task {
    const KIND: RecordKind = RecordKind::Task;
    type Patch = TaskPatch;

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
        &[]
    }

    fn search_text(&self) -> String {
        [self.title.as_str(), self.description.as_str()].join(" ")
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        validate_title(RecordKind::Task, &self.title)
    }

    fn validate_patch(patch: &TaskPatch) -> Result<(), RecordValidationError> {
        match &patch.title {
            Some(title) => validate_title(RecordKind::Task, title),
            None => Ok(()),
        }
    }

    fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = refreshed_timestamp(self.updated_at);
    }
}

// A key that is present (even as `null`) becomes `Some(..)`; absent keys stay `None`
// through `#[serde(default)]`.
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
