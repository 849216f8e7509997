//! Record store over JSON collection files.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete/search for notes and tasks.
//! - Persist every mutation through the atomic write protocol.
//!
//! # Invariants
//! - Each call reloads the target collection; the store holds only paths.
//! - Records keep file order; `create` appends.
//! - `update` of a missing id returns `NotFound`.
//! - `delete` of a missing id succeeds without touching the file.

use crate::config::StoreConfig;
use crate::model::record::{Record, RecordId};
use crate::model::task::{Task, TaskPatch, TaskStatus};
use crate::search::query::SearchQuery;
use crate::store::json_file::{read_json_or_default, stage_json, write_json_atomic, StagedWrite};
use crate::store::{StoreError, StoreResult};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Record store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    /// Opens a store, creating the data directory when missing.
    ///
    /// # Errors
    /// - `Io` when the data directory cannot be created.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir).map_err(|err| {
            error!(
                "event=store_open module=store status=error error_code=data_dir_create_failed error={}",
                err
            );
            StoreError::io(&config.data_dir, err)
        })?;
        info!(
            "event=store_open module=store status=ok data_dir={}",
            config.data_dir.display()
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Backing file of the collection holding `R`.
    pub fn collection_path<R: Record>(&self) -> PathBuf {
        self.config.collection_path(R::KIND)
    }

    /// Loads the full collection in file order. A missing file is empty.
    pub fn list<R: Record>(&self) -> StoreResult<Vec<R>> {
        read_json_or_default(&self.collection_path::<R>())
    }

    /// Gets one record by id.
    pub fn get<R: Record>(&self, id: &RecordId) -> StoreResult<R> {
        self.list::<R>()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            })
    }

    /// Appends a new record and persists the collection.
    ///
    /// # Errors
    /// - `Validation` when record fields violate write rules.
    /// - `DuplicateId` when the id is already present.
    pub fn create<R: Record>(&self, record: R) -> StoreResult<R> {
        record.validate()?;
        let mut records = self.list::<R>()?;
        if records.iter().any(|existing| existing.id() == record.id()) {
            return Err(StoreError::DuplicateId {
                kind: R::KIND,
                id: record.id().clone(),
            });
        }

        records.push(record.clone());
        self.save(&records)?;
        info!(
            "event=record_create module=store status=ok kind={} id={} count={}",
            R::KIND,
            record.id(),
            records.len()
        );
        Ok(record)
    }

    /// Applies `patch` to the matching record and persists the collection.
    ///
    /// Only fields present in the patch change, plus `updated_at`. Fields the
    /// patch leaves alone are not re-validated.
    ///
    /// # Errors
    /// - `NotFound` when no record has `id`.
    /// - `Validation` when a field set by the patch violates write rules.
    pub fn update<R: Record>(&self, id: &RecordId, patch: R::Patch) -> StoreResult<R> {
        let started_at = Instant::now();
        let mut records = self.list::<R>()?;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            info!(
                "event=record_update module=store status=not_found kind={} id={}",
                R::KIND,
                id
            );
            return Err(StoreError::NotFound {
                kind: R::KIND,
                id: id.clone(),
            });
        };

        R::validate_patch(&patch)?;
        let mut updated = records[index].clone();
        updated.apply_patch(patch);
        records[index] = updated.clone();
        self.save(&records)?;
        info!(
            "event=record_update module=store status=ok kind={} id={} duration_ms={}",
            R::KIND,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    /// Removes the matching record.
    ///
    /// Returns `false` without rewriting the file when no record has `id`.
    pub fn delete<R: Record>(&self, id: &RecordId) -> StoreResult<bool> {
        let mut records = self.list::<R>()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            info!(
                "event=record_delete module=store status=noop kind={} id={}",
                R::KIND,
                id
            );
            return Ok(false);
        }

        self.save(&records)?;
        info!(
            "event=record_delete module=store status=ok kind={} id={} count={}",
            R::KIND,
            id,
            records.len()
        );
        Ok(true)
    }

    /// Returns matching records in collection order.
    pub fn search<R: Record>(&self, query: &SearchQuery) -> StoreResult<Vec<R>> {
        let hits = query.filter(self.list::<R>()?);
        debug!(
            "event=record_search module=store status=ok kind={} tag_filter={} hits={}",
            R::KIND,
            query.tag.is_some(),
            hits.len()
        );
        Ok(hits)
    }

    /// Marks a task as done.
    pub fn complete_task(&self, id: &RecordId) -> StoreResult<Task> {
        self.update::<Task>(id, TaskPatch::complete())
    }

    /// Lists tasks currently in `status`.
    pub fn tasks_with_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>> {
        Ok(self
            .list::<Task>()?
            .into_iter()
            .filter(|task| task.status == status)
            .collect())
    }

    /// Stages a full collection rewrite without renaming it into place.
    pub fn stage<R: Record>(&self, records: &[R]) -> StoreResult<StagedWrite> {
        stage_json(&self.collection_path::<R>(), records)
    }

    fn save<R: Record>(&self, records: &[R]) -> StoreResult<()> {
        let path = self.collection_path::<R>();
        write_json_atomic(&path, records).map_err(|err| {
            error!(
                "event=collection_write module=store status=error kind={} error_code=atomic_write_failed error={}",
                R::KIND,
                err
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::config::StoreConfig;
    use crate::model::note::{Note, NotePatch};
    use crate::model::record::{RecordId, RecordSource};
    use crate::store::StoreError;

    fn open_store(dir: &tempfile::TempDir) -> RecordStore {
        RecordStore::open(StoreConfig::new(dir.path().join("data"))).unwrap()
    }

    #[test]
    fn open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        assert!(store.data_dir().is_dir());
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let note = Note::new("T", "b", Vec::new(), RecordSource::Manual);
        store.create(note.clone()).unwrap();

        let err = store.create(note).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId { .. }));
        assert_eq!(store.list::<Note>().unwrap().len(), 1);
    }

    #[test]
    fn failed_validation_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let note = store
            .create(Note::new("T", "b", Vec::new(), RecordSource::Manual))
            .unwrap();

        let err = store
            .update::<Note>(
                &note.id,
                NotePatch {
                    title: Some("   ".to_string()),
                    ..NotePatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get::<Note>(&note.id).unwrap(), note);
    }

    #[test]
    fn delete_of_missing_id_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let removed = store.delete::<Note>(&RecordId::from("missing")).unwrap();
        assert!(!removed);
        assert!(!store.collection_path::<Note>().exists());
    }
}
