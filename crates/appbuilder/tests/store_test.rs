use appbuilder::{FileProjectStore, ProjectStore, StoreError};
use serde_json::{Value, json};
use tempfile::TempDir;

fn store() -> (TempDir, FileProjectStore) {
    let dir = TempDir::new().unwrap();
    let store = FileProjectStore::new(dir.path().join("projects"));
    (dir, store)
}

fn object(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn list_on_missing_directory_is_empty() {
    let (_dir, store) = store();
    assert!(store.list().unwrap().is_empty());
    assert!(store.dir().is_dir());
}

#[test]
fn saved_file_is_pretty_json() {
    let (_dir, store) = store();
    let id = store.create_or_update(object(json!({"metadata": {"name": "a"}}))).unwrap();

    let content = std::fs::read_to_string(store.dir().join(format!("{id}.json"))).unwrap();
    assert!(content.contains("\n  \"metadata\""), "{content}");
    assert!(!store.dir().join(format!("{id}.json.tmp")).exists());
}

#[test]
fn list_skips_unreadable_files() {
    let (_dir, store) = store();
    let id = store.create_or_update(object(json!({"metadata": {"name": "good"}}))).unwrap();
    std::fs::write(store.dir().join("broken.json"), "{ not json").unwrap();
    std::fs::write(store.dir().join("array.json"), "[1, 2]").unwrap();
    std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

    let list = store.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
    assert_eq!(list[0].name, "good");
}

#[test]
fn corrupt_project_is_reported_on_get() {
    let (_dir, store) = store();
    store.create_or_update(object(json!({}))).unwrap();
    std::fs::write(store.dir().join("broken.json"), "{ not json").unwrap();

    assert!(matches!(store.get("broken"), Err(StoreError::Json { .. })));
}

#[test]
fn delete_removes_the_file() {
    let (_dir, store) = store();
    let id = store.create_or_update(object(json!({}))).unwrap();
    store.delete(&id).unwrap();

    assert!(!store.dir().join(format!("{id}.json")).exists());
    assert!(matches!(store.delete(&id), Err(StoreError::NotFound { .. })));
}

#[test]
fn path_traversal_is_rejected() {
    let (dir, store) = store();
    std::fs::write(dir.path().join("secret.json"), "{}").unwrap();

    assert!(matches!(store.get("../secret"), Err(StoreError::InvalidId { .. })));
    assert!(matches!(
        store.update("../secret", object(json!({}))),
        Err(StoreError::InvalidId { .. })
    ));
    assert!(matches!(
        store.create_or_update(object(json!({"projectId": "../secret"}))),
        Err(StoreError::InvalidId { .. })
    ));
}
