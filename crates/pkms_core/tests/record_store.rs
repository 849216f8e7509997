use pkms_core::{
    Note, NotePatch, RecordId, RecordSource, RecordStore, SearchQuery, StoreConfig, StoreError,
    Task, TaskPatch, TaskStatus,
};
use std::fs;
use tempfile::TempDir;

fn open_store() -> (TempDir, RecordStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(StoreConfig::new(dir.path().join("data"))).unwrap();
    (dir, store)
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn list_on_fresh_store_is_empty() {
    let (_dir, store) = open_store();
    assert!(store.list::<Note>().unwrap().is_empty());
    assert!(store.list::<Task>().unwrap().is_empty());
}

#[test]
fn notes_and_tasks_lifecycle() {
    let (_dir, store) = open_store();

    let note = store
        .create(Note::new("T1", "Body here", tags(&["x"]), RecordSource::Manual))
        .unwrap();
    assert!(store.list::<Note>().unwrap().iter().any(|n| n.id == note.id));

    store
        .update::<Note>(
            &note.id,
            NotePatch {
                title: Some("T1-updated".to_string()),
                ..NotePatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.get::<Note>(&note.id).unwrap().title, "T1-updated");

    assert!(store.delete::<Note>(&note.id).unwrap());
    assert!(store.list::<Note>().unwrap().is_empty());

    let task = store
        .create(Task::new("Task1", "do stuff", None, RecordSource::Manual))
        .unwrap();
    store.complete_task(&task.id).unwrap();
    assert_eq!(store.get::<Task>(&task.id).unwrap().status, TaskStatus::Done);

    assert!(store.delete::<Task>(&task.id).unwrap());
    assert!(store.list::<Task>().unwrap().is_empty());
}

#[test]
fn records_round_trip_through_files_in_insertion_order() {
    let (_dir, store) = open_store();
    let first = store
        .create(Note::new("a", "one", tags(&["t1", "t2"]), RecordSource::Manual))
        .unwrap();
    let second = store
        .create(Note::new("b", "two", Vec::new(), RecordSource::Agent))
        .unwrap();
    let third = store
        .create(Note::new("c", "three", tags(&["t1"]), RecordSource::Manual))
        .unwrap();

    let listed = store.list::<Note>().unwrap();
    assert_eq!(listed, vec![first, second, third]);
}

#[test]
fn persisted_file_is_pretty_json_array_with_utc_timestamps() {
    let (_dir, store) = open_store();
    let task = store
        .create(Task::new(
            "Write report",
            "draft",
            Some("2030-01-31".to_string()),
            RecordSource::Manual,
        ))
        .unwrap();

    let raw = fs::read_to_string(store.collection_path::<Task>()).unwrap();
    assert!(raw.starts_with("[\n  {"));
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &value[0];
    assert_eq!(entry["id"], task.id.as_str());
    assert_eq!(entry["status"], "todo");
    assert_eq!(entry["due_date"], "2030-01-31");
    assert_eq!(entry["source"], "manual");
    assert!(entry["created_at"].as_str().unwrap().ends_with('Z'));
    assert!(entry["updated_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn update_changes_only_patched_field_and_leaves_other_records_alone() {
    let (_dir, store) = open_store();
    let target = store
        .create(Task::new("first", "desc", Some("soon".to_string()), RecordSource::Manual))
        .unwrap();
    let bystander = store
        .create(Task::new("second", "other", None, RecordSource::Manual))
        .unwrap();

    let updated = store
        .update::<Task>(
            &target.id,
            TaskPatch {
                description: Some("new desc".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.description, "new desc");
    assert_eq!(updated.title, target.title);
    assert_eq!(updated.due_date, target.due_date);
    assert_eq!(updated.status, target.status);
    assert_eq!(updated.created_at, target.created_at);
    assert_eq!(updated.source, target.source);
    assert!(updated.updated_at > target.updated_at);
    assert_eq!(store.get::<Task>(&bystander.id).unwrap(), bystander);
}

#[test]
fn update_can_clear_due_date_and_change_status() {
    let (_dir, store) = open_store();
    let task = store
        .create(Task::new("T1", "", Some("friday".to_string()), RecordSource::Manual))
        .unwrap();

    let updated = store
        .update::<Task>(
            &task.id,
            TaskPatch {
                title: Some("NewT".to_string()),
                due_date: Some(None),
                status: Some(TaskStatus::InProgress),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "NewT");
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.status, TaskStatus::InProgress);
}

#[test]
fn update_of_missing_id_is_not_found() {
    let (_dir, store) = open_store();
    let err = store
        .update::<Note>(&RecordId::from("missing"), NotePatch::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn get_of_missing_id_is_not_found() {
    let (_dir, store) = open_store();
    let err = store.get::<Task>(&RecordId::from("missing")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn delete_of_missing_task_succeeds_without_changes() {
    let (_dir, store) = open_store();
    let task = store
        .create(Task::new("keep", "", None, RecordSource::Manual))
        .unwrap();
    let before = fs::read(store.collection_path::<Task>()).unwrap();

    let removed = store.delete::<Task>(&RecordId::from("no-such-id")).unwrap();

    assert!(!removed);
    assert_eq!(fs::read(store.collection_path::<Task>()).unwrap(), before);
    assert_eq!(store.list::<Task>().unwrap(), vec![task]);
}

#[test]
fn complete_moves_todo_to_done_with_newer_timestamp() {
    let (_dir, store) = open_store();
    let task = store
        .create(Task::new("finish", "", None, RecordSource::Manual))
        .unwrap();
    assert_eq!(task.status, TaskStatus::Todo);

    let done = store.complete_task(&task.id).unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.updated_at > task.updated_at);
    assert!(done.updated_at >= done.created_at);
}

#[test]
fn complete_of_missing_task_is_not_found() {
    let (_dir, store) = open_store();
    let err = store.complete_task(&RecordId::from("ghost")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn create_rejects_blank_title() {
    let (_dir, store) = open_store();
    let err = store
        .create(Task::new("   ", "", None, RecordSource::Manual))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(!store.collection_path::<Task>().exists());
}

#[test]
fn search_matches_text_and_tag_in_collection_order() {
    let (_dir, store) = open_store();
    let work = store
        .create(Note::new("Plan", "quarterly report", tags(&["work"]), RecordSource::Manual))
        .unwrap();
    store
        .create(Note::new("Groceries", "milk", tags(&["home"]), RecordSource::Manual))
        .unwrap();
    let home_report = store
        .create(Note::new("Taxes", "annual REPORT", tags(&["home"]), RecordSource::Manual))
        .unwrap();

    let hits = store.search::<Note>(&SearchQuery::new("report")).unwrap();
    assert_eq!(hits, vec![work.clone(), home_report.clone()]);

    let tagged = store
        .search::<Note>(&SearchQuery::new("report").with_tag("home"))
        .unwrap();
    assert_eq!(tagged, vec![home_report]);

    let by_tag_text = store.search::<Note>(&SearchQuery::new("WORK")).unwrap();
    assert_eq!(by_tag_text, vec![work]);
}

#[test]
fn task_search_covers_title_and_description() {
    let (_dir, store) = open_store();
    store
        .create(Task::new("Write report", "draft report", None, RecordSource::Manual))
        .unwrap();
    store
        .create(Task::new("Call Bob", "discuss stats", None, RecordSource::Manual))
        .unwrap();

    let hits = store.search::<Task>(&SearchQuery::new("report")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Write report");
    let hits = store.search::<Task>(&SearchQuery::new("stats")).unwrap();
    assert_eq!(hits[0].title, "Call Bob");
}

#[test]
fn list_and_search_are_idempotent() {
    let (_dir, store) = open_store();
    store
        .create(Note::new("a", "alpha", Vec::new(), RecordSource::Manual))
        .unwrap();
    store
        .create(Note::new("b", "beta alpha", Vec::new(), RecordSource::Manual))
        .unwrap();

    assert_eq!(store.list::<Note>().unwrap(), store.list::<Note>().unwrap());
    let query = SearchQuery::new("alpha");
    assert_eq!(
        store.search::<Note>(&query).unwrap(),
        store.search::<Note>(&query).unwrap()
    );
}

#[test]
fn tasks_with_status_filters_by_state() {
    let (_dir, store) = open_store();
    let open = store
        .create(Task::new("open", "", None, RecordSource::Manual))
        .unwrap();
    let closed = store
        .create(Task::new("closed", "", None, RecordSource::Manual))
        .unwrap();
    let closed = store.complete_task(&closed.id).unwrap();

    assert_eq!(store.tasks_with_status(TaskStatus::Todo).unwrap(), vec![open]);
    assert_eq!(store.tasks_with_status(TaskStatus::Done).unwrap(), vec![closed]);
    assert!(store
        .tasks_with_status(TaskStatus::InProgress)
        .unwrap()
        .is_empty());
}

#[test]
fn invalid_collection_file_is_malformed_storage() {
    let (_dir, store) = open_store();
    fs::write(store.collection_path::<Note>(), "{ definitely not an array").unwrap();

    let err = store.list::<Note>().unwrap_err();
    assert!(matches!(err, StoreError::MalformedStorage { .. }));
    assert!(!err.is_recoverable());

    let err = store
        .create(Note::new("t", "b", Vec::new(), RecordSource::Manual))
        .unwrap_err();
    assert!(matches!(err, StoreError::MalformedStorage { .. }));
}

#[test]
fn unknown_keys_in_collection_file_are_ignored() {
    let (_dir, store) = open_store();
    fs::write(
        store.collection_path::<Note>(),
        r#"[{"id":"legacy-1","title":"Old","body":"b","tags":[],"created_at":"2024-01-01T00:00:00Z","updated_at":"2024-01-02T00:00:00Z","source":"manual","pinned":true}]"#,
    )
    .unwrap();

    let notes = store.list::<Note>().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id.as_str(), "legacy-1");
    assert_eq!(notes[0].title, "Old");
}

#[test]
fn each_operation_rereads_external_edits() {
    let (_dir, store) = open_store();
    let other = RecordStore::open(store.config().clone()).unwrap();
    let note = other
        .create(Note::new("from elsewhere", "", Vec::new(), RecordSource::Manual))
        .unwrap();

    assert_eq!(store.get::<Note>(&note.id).unwrap(), note);
}

#[test]
fn untitled_stored_task_can_still_be_completed() {
    let (_dir, store) = open_store();
    fs::write(store.collection_path::<Task>(), r#"[{"id":"t1"}]"#).unwrap();

    let done = store.complete_task(&RecordId::from("t1")).unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.title.is_empty());
    assert!(done.updated_at > done.created_at);

    let err = store
        .update::<Task>(
            &RecordId::from("t1"),
            TaskPatch {
                title: Some("  ".to_string()),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn stored_record_without_created_at_keeps_timestamp_order() {
    let (_dir, store) = open_store();
    fs::write(
        store.collection_path::<Note>(),
        r#"[{"id":"n1","title":"Old","updated_at":"2020-06-01T00:00:00Z"}]"#,
    )
    .unwrap();

    let note = store.get::<Note>(&RecordId::from("n1")).unwrap();
    assert!(note.updated_at >= note.created_at);
    assert_eq!(note.created_at, note.updated_at);
}
