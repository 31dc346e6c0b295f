use super::{export_document, import_document, LocalStore, SECTIONS_KEY, STORE_KEY};
use crate::sections::SectionList;
use crate::store::HierarchyStore;
use std::fs;

fn sample_store() -> HierarchyStore {
    let mut store = HierarchyStore::new();
    let _ = store.add_category();
    let _ = store.update_category_name(0, "Admin".to_string());
    let _ = store.add_item(0, 0);
    store
}

#[test]
fn test_open_missing_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let local = LocalStore::open(dir.path().join("store.json")).unwrap();

    assert!(local.get(STORE_KEY).is_none());
    assert!(local.load_store().unwrap().is_none());
    assert!(local.load_sections().unwrap().is_none());
}

#[test]
fn test_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let store = sample_store();
    let mut sections = SectionList::default();
    sections.set_checked(1, true);
    sections.tag_checked("0.01");

    let mut local = LocalStore::open(&path).unwrap();
    local.save(&store, &sections).unwrap();

    let reopened = LocalStore::open(&path).unwrap();
    let loaded = reopened.load_store().unwrap().unwrap();
    assert_eq!(loaded.serialize(), store.serialize());
    assert_eq!(reopened.load_sections().unwrap().unwrap(), sections);
}

#[test]
fn test_blobs_are_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let mut local = LocalStore::open(&path).unwrap();
    local.set("other", "{\"opaque\": true}".to_string());
    local.flush().unwrap();

    let reopened = LocalStore::open(&path).unwrap();
    assert_eq!(reopened.get("other"), Some("{\"opaque\": true}"));

    let mut reopened = reopened;
    reopened.remove("other");
    assert!(reopened.get("other").is_none());
}

#[test]
fn test_corrupt_blob_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut local = LocalStore::open(dir.path().join("store.json")).unwrap();
    local.set(STORE_KEY, "{not json".to_string());
    local.set(SECTIONS_KEY, "[1, 2]".to_string());

    assert!(local.load_store().is_err());
    assert!(local.load_sections().is_err());
}

#[test]
fn test_corrupt_store_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    fs::write(&path, "garbage").unwrap();

    assert!(LocalStore::open(&path).is_err());
}

#[test]
fn test_export_import_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    let store = sample_store();
    let sections = SectionList::default();

    export_document(&path, &store, &sections).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"paperSections\""));
    assert!(text.contains("\"johnnyDecimal\""));

    let (imported, imported_sections) = import_document(&path).unwrap();
    assert_eq!(imported.serialize(), store.serialize());
    assert_eq!(imported_sections, sections);
}
