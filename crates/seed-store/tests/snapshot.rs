//! Snapshot save/restore of the in-process store.

use pretty_assertions::assert_eq;
use seed_core::{FieldValue, Record};
use seed_store::{CustomFieldStatus, MemoryStore, Store};
use serde_json::json;

fn named(name: &str) -> Record {
    let mut record = Record::new();
    record.insert("name".into(), FieldValue::from(name));
    record
}

#[test]
fn missing_snapshot_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::open(&dir.path().join("store.jsonl")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn saved_store_restores_entities_refs_and_custom_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.jsonl");

    let mut store = MemoryStore::new();
    store.register_custom_field("owner", &["Rack"]).unwrap();
    let (site, _) = store.find_or_create("Site", &named("HQ"), Record::new()).unwrap();
    let mut defaults = Record::new();
    defaults.insert("site".into(), FieldValue::Ref(site.to_ref()));
    let (mut rack, _) = store.find_or_create("Rack", &named("R1"), defaults).unwrap();
    rack.custom_field_data_mut().insert("owner".into(), json!("noc"));
    store.persist(&rack).unwrap();
    store.save(&path).unwrap();

    let restored = MemoryStore::open(&path).unwrap();
    assert_eq!(restored.len(), 3);
    assert_eq!(restored.count("Rack"), 1);

    let rack = restored.get(rack.id).unwrap().unwrap();
    assert_eq!(rack.get("site"), Some(&FieldValue::Ref(site.to_ref())));
    assert_eq!(rack.custom_field("owner"), Some(&json!("noc")));
    assert_eq!(
        restored.custom_field_status("owner", "rack").unwrap(),
        CustomFieldStatus::Enabled
    );
}

#[test]
fn restored_store_does_not_duplicate_on_find_or_create() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.jsonl");

    let mut store = MemoryStore::new();
    store.find_or_create("Site", &named("HQ"), Record::new()).unwrap();
    store.save(&path).unwrap();

    let mut restored = MemoryStore::open(&path).unwrap();
    let (_, created) = restored
        .find_or_create("Site", &named("HQ"), Record::new())
        .unwrap();
    assert!(!created);
    assert_eq!(restored.count("Site"), 1);
}

#[test]
fn corrupt_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.jsonl");
    std::fs::write(&path, "{not json}\n").unwrap();
    assert!(MemoryStore::open(&path).is_err());
}
