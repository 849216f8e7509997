//! Agent output for one note and draft records derived from it.

use crate::agent::heuristics::{suggest_tasks, summarize_text, TaskSuggestion};
use crate::model::note::Note;
use crate::model::record::{RecordId, RecordSource};
use crate::model::task::Task;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_SUMMARY_SENTENCES: usize = 2;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

const SUMMARY_TAG: &str = "summary";
const AGENT_TAG: &str = "agent";
const NOTEBOOK_TAG_PREFIX: &str = "notebook:";

/// Limits applied when analyzing a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    pub max_sentences: usize,
    pub max_suggestions: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_sentences: DEFAULT_SUMMARY_SENTENCES,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

/// Summary and suggestions computed from one note body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    pub note_id: RecordId,
    pub summary: String,
    pub suggestions: Vec<TaskSuggestion>,
    pub created_at: DateTime<Utc>,
}

/// Runs the summarizer and suggester over `note.body`.
pub fn analyze_note(note: &Note, options: &AnalyzeOptions) -> AgentReport {
    AgentReport {
        note_id: note.id.clone(),
        summary: summarize_text(&note.body, options.max_sentences),
        suggestions: suggest_tasks(&note.body, options.max_suggestions),
        created_at: Utc::now(),
    }
}

/// Builds the agent-sourced note that stores a summary of `note`.
///
/// Tagged `summary` and `agent`, plus `notebook:<name>` when a notebook is given.
pub fn summary_note(note: &Note, summary: &str, notebook: Option<&str>) -> Note {
    let title = if note.title.trim().is_empty() {
        "Summary".to_string()
    } else {
        format!("Summary: {}", note.title)
    };
    let mut tags = vec![SUMMARY_TAG.to_string(), AGENT_TAG.to_string()];
    if let Some(name) = notebook.map(str::trim).filter(|name| !name.is_empty()) {
        tags.push(format!("{NOTEBOOK_TAG_PREFIX}{name}"));
    }
    Note::new(title, summary, tags, RecordSource::Agent)
}

/// Builds the agent-sourced task accepted from a suggestion.
pub fn task_from_suggestion(suggestion: &TaskSuggestion) -> Task {
    Task::new(
        suggestion.title.clone(),
        suggestion.excerpt.clone(),
        None,
        RecordSource::Agent,
    )
}
