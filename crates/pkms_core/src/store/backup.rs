//! Whole-store export, import and repair.
//!
//! # Responsibility
//! - Serialize both collections into one `{notes, tasks}` document.
//! - Restore collections from such a document, merging or replacing.
//!
//! # Invariants
//! - Merge import never alters or removes an existing record; on id collision
//!   the pre-existing record wins.
//! - Replace import and repair never read the current collection files, so
//!   they work when those files are corrupted.
//! - Ids stay unique: a repeated id inside one document keeps its first copy,
//!   in both modes.
//! - The document is fully parsed and both collections are staged before
//!   any collection is renamed into place.

use crate::model::note::Note;
use crate::model::record::{Record, RecordId};
use crate::model::task::Task;
use crate::store::json_file::{read_json, write_json_in_place};
use crate::store::record_store::RecordStore;
use crate::store::StoreResult;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Export/backup document holding both collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// How imported records combine with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Append records whose id is not present yet.
    Merge,
    /// Replace both collections wholesale.
    Replace,
}

/// Per-collection counts reported by import/repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub notes_added: usize,
    pub notes_skipped: usize,
    pub tasks_added: usize,
    pub tasks_skipped: usize,
}

impl RecordStore {
    /// Loads both collections into one document.
    pub fn snapshot(&self) -> StoreResult<BackupDocument> {
        Ok(BackupDocument {
            notes: self.list::<Note>()?,
            tasks: self.list::<Task>()?,
        })
    }

    /// Writes both collections to `path`, overwriting any existing file.
    ///
    /// The export file is written in place, not through the atomic protocol.
    pub fn export(&self, path: &Path) -> StoreResult<BackupDocument> {
        let document = self.snapshot()?;
        write_json_in_place(path, &document)?;
        info!(
            "event=store_export module=store status=ok notes={} tasks={}",
            document.notes.len(),
            document.tasks.len()
        );
        Ok(document)
    }

    /// Imports the document at `path`.
    ///
    /// # Errors
    /// - `Io` when `path` cannot be read.
    /// - `MalformedStorage` when the document (or, in merge mode, a current
    ///   collection file) fails to parse.
    pub fn import(&self, path: &Path, mode: ImportMode) -> StoreResult<ImportSummary> {
        let document: BackupDocument = read_json(path)?;
        let (current_notes, current_tasks) = match mode {
            ImportMode::Replace => (Vec::new(), Vec::new()),
            ImportMode::Merge => (self.list::<Note>()?, self.list::<Task>()?),
        };
        let (notes, notes_added, notes_skipped) = merge_by_id(current_notes, document.notes);
        let (tasks, tasks_added, tasks_skipped) = merge_by_id(current_tasks, document.tasks);
        let summary = ImportSummary {
            notes_added,
            notes_skipped,
            tasks_added,
            tasks_skipped,
        };

        // Both collections are fully staged before either rename.
        let notes_write = self.stage(&notes)?;
        let tasks_write = self.stage(&tasks)?;
        tasks_write.commit()?;
        notes_write.commit()?;

        info!(
            "event=store_import module=store status=ok mode={:?} notes_added={} notes_skipped={} tasks_added={} tasks_skipped={}",
            mode,
            summary.notes_added,
            summary.notes_skipped,
            summary.tasks_added,
            summary.tasks_skipped
        );
        Ok(summary)
    }

    /// Overwrites both collections from a backup document.
    pub fn repair(&self, backup_path: &Path) -> StoreResult<ImportSummary> {
        info!("event=store_repair module=store status=start");
        self.import(backup_path, ImportMode::Replace)
    }
}

/// Appends incoming records whose id is not yet present in `existing` or
/// earlier in `incoming`.
///
/// Returns the merged collection plus added/skipped counts.
fn merge_by_id<R: Record>(existing: Vec<R>, incoming: Vec<R>) -> (Vec<R>, usize, usize) {
    let mut seen: HashSet<RecordId> = existing.iter().map(|record| record.id().clone()).collect();
    let mut merged = existing;
    let mut added = 0;
    let mut skipped = 0;
    for record in incoming {
        if seen.insert(record.id().clone()) {
            merged.push(record);
            added += 1;
        } else {
            skipped += 1;
        }
    }
    (merged, added, skipped)
}
