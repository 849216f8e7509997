//! Note summarization use-case service.
//!
//! # Responsibility
//! - Run the heuristic agent over a stored note.
//! - Optionally persist the summary note and the first suggested task.
//!
//! # Invariants
//! - The source note is never modified.
//! - Records created here are `source = agent`.

use crate::agent::heuristics::TaskSuggestion;
use crate::agent::report::{
    analyze_note, summary_note, task_from_suggestion, AgentReport, AnalyzeOptions,
};
use crate::model::note::Note;
use crate::model::record::RecordId;
use crate::model::task::Task;
use crate::store::record_store::RecordStore;
use crate::store::StoreResult;
use log::info;

/// Input for one summarize call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub note_id: RecordId,
    pub options: AnalyzeOptions,
    /// Persist the summary as a new note.
    pub save: bool,
    /// Notebook tag for the saved summary note.
    pub notebook: Option<String>,
    /// Create a task from the first suggestion.
    pub accept: bool,
}

impl SummarizeRequest {
    pub fn new(note_id: RecordId) -> Self {
        Self {
            note_id,
            options: AnalyzeOptions::default(),
            save: false,
            notebook: None,
            accept: false,
        }
    }
}

/// Report plus any records created while handling the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeOutcome {
    pub source: Note,
    pub report: AgentReport,
    pub saved_note: Option<Note>,
    pub accepted_task: Option<Task>,
}

/// Summarize facade over a record store.
pub struct SummarizeService<'store> {
    store: &'store RecordStore,
}

impl<'store> SummarizeService<'store> {
    pub fn new(store: &'store RecordStore) -> Self {
        Self { store }
    }

    /// Summarizes one stored note.
    ///
    /// # Errors
    /// - `NotFound` when the note does not exist.
    /// - Any store error raised while persisting created records.
    pub fn summarize(&self, request: &SummarizeRequest) -> StoreResult<SummarizeOutcome> {
        let source = self.store.get::<Note>(&request.note_id)?;
        let report = analyze_note(&source, &request.options);

        let saved_note = if request.save {
            let draft = summary_note(&source, &report.summary, request.notebook.as_deref());
            Some(self.store.create(draft)?)
        } else {
            None
        };

        let accepted_task = match (request.accept, report.suggestions.first()) {
            (true, Some(first)) => Some(self.accept_suggestion(first)?),
            _ => None,
        };

        info!(
            "event=note_summarize module=service status=ok id={} suggestions={} saved={} accepted={}",
            source.id,
            report.suggestions.len(),
            saved_note.is_some(),
            accepted_task.is_some()
        );
        Ok(SummarizeOutcome {
            source,
            report,
            saved_note,
            accepted_task,
        })
    }

    /// Persists a suggestion as a new `todo` task.
    pub fn accept_suggestion(&self, suggestion: &TaskSuggestion) -> StoreResult<Task> {
        self.store.create(task_from_suggestion(suggestion))
    }
}
