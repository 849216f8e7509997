//! Note/task domain model.
//!
//! # Responsibility
//! - Define the record shapes persisted in `notes.json` and `tasks.json`.
//! - Define explicit optional-field patches used by update operations.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - `updated_at >= created_at` for every record.

pub mod note;
pub mod record;
pub mod task;
