//! Core domain logic for the PKMS note/task tools.
//! This crate is the single source of truth for storage and record invariants.

pub mod agent;
pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use agent::heuristics::{split_sentences, suggest_tasks, summarize_text, TaskSuggestion};
pub use agent::report::{analyze_note, AgentReport, AnalyzeOptions};
pub use config::{default_data_dir, StoreConfig, DATA_DIR_ENV};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NotePatch};
pub use model::record::{Record, RecordId, RecordKind, RecordSource, RecordValidationError};
pub use model::task::{Task, TaskPatch, TaskStatus};
pub use search::query::SearchQuery;
pub use service::summarize_service::{SummarizeOutcome, SummarizeRequest, SummarizeService};
pub use store::backup::{BackupDocument, ImportMode, ImportSummary};
pub use store::record_store::RecordStore;
pub use store::{StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
