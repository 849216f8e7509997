use pkms_core::store::json_file::stage_json;
use pkms_core::{Note, RecordSource, RecordStore, StoreConfig};
use std::fs;

fn temp_files_in(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn abandoned_write_leaves_original_bytes_and_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(StoreConfig::new(dir.path())).unwrap();
    store
        .create(Note::new("kept", "original", Vec::new(), RecordSource::Manual))
        .unwrap();
    let path = store.collection_path::<Note>();
    let original = fs::read(&path).unwrap();

    let mut next = store.list::<Note>().unwrap();
    next.push(Note::new("lost", "never renamed", Vec::new(), RecordSource::Manual));
    let staged = store.stage(&next).unwrap();
    assert!(staged.temp_path().exists());
    assert_eq!(fs::read(&path).unwrap(), original);

    // Interrupted before rename.
    drop(staged);

    assert_eq!(fs::read(&path).unwrap(), original);
    assert!(temp_files_in(dir.path()).is_empty());
    assert_eq!(store.list::<Note>().unwrap().len(), 1);
}

#[test]
fn committed_write_replaces_whole_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(StoreConfig::new(dir.path())).unwrap();
    store
        .create(Note::new("old", "", Vec::new(), RecordSource::Manual))
        .unwrap();

    let replacement = vec![Note::new("new", "", Vec::new(), RecordSource::Manual)];
    store.stage(&replacement).unwrap().commit().unwrap();

    assert_eq!(store.list::<Note>().unwrap(), replacement);
    assert!(temp_files_in(dir.path()).is_empty());
}

#[test]
fn failed_rename_keeps_destination_and_cleans_temp() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the destination path makes the final rename fail.
    let destination = dir.path().join("blocked.json");
    fs::create_dir(&destination).unwrap();
    fs::write(destination.join("inside.txt"), "keep").unwrap();

    let staged = stage_json(&destination, &vec!["value"]).unwrap();
    assert!(staged.commit().is_err());

    assert!(destination.is_dir());
    assert_eq!(fs::read_to_string(destination.join("inside.txt")).unwrap(), "keep");
    assert!(temp_files_in(dir.path()).is_empty());
}

#[test]
fn staging_into_missing_directory_fails_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("absent").join("notes.json");

    assert!(stage_json(&destination, &vec!["value"]).is_err());
    assert!(!destination.exists());
}
