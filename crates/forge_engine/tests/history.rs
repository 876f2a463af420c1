use std::fs;

use forge_core::{HistoryItem, HISTORY_LIMIT};
use forge_engine::{FileHistoryStorage, HistoryStorage, HistoryStore, MemoryHistoryStorage};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn item(n: i64, url: &str) -> HistoryItem {
    HistoryItem {
        id: n.to_string(),
        url: url.to_string(),
        requirement: format!("requirement {n}"),
        timestamp: n,
    }
}

#[test]
fn record_persists_newest_first_and_caps() {
    forge_logging::initialize_for_tests();
    let storage = MemoryHistoryStorage::new();
    let mut store = HistoryStore::load(storage.clone());

    for n in 1..=7 {
        store
            .record(item(n, &format!("https://s{n}.example.com")))
            .unwrap();
        assert_eq!(store.items().len(), (n as usize).min(HISTORY_LIMIT));
    }

    let persisted: Vec<HistoryItem> = serde_json::from_str(&storage.value().unwrap()).unwrap();
    let stamps: Vec<i64> = persisted.iter().map(|i| i.timestamp).collect();
    assert_eq!(stamps, vec![7, 6, 5, 4, 3]);
    assert_eq!(persisted, store.items());
}

#[test]
fn same_url_replaces_and_moves_to_front() {
    let mut store = HistoryStore::load(MemoryHistoryStorage::new());
    store.record(item(1, "https://a.example.com")).unwrap();
    store.record(item(2, "https://b.example.com")).unwrap();
    store.record(item(3, "https://a.example.com")).unwrap();

    let urls: Vec<&str> = store.items().iter().map(|i| i.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.example.com", "https://b.example.com"]);
    assert_eq!(store.items()[0].requirement, "requirement 3");
}

#[test]
fn undecodable_value_loads_as_empty() {
    forge_logging::initialize_for_tests();
    let store = HistoryStore::load(MemoryHistoryStorage::with_value("{not json"));
    assert!(store.items().is_empty());

    let store = HistoryStore::load(MemoryHistoryStorage::with_value(r#"{"id":"1"}"#));
    assert!(store.items().is_empty());
}

#[test]
fn clear_empties_and_removes_value() {
    let storage = MemoryHistoryStorage::new();
    let mut store = HistoryStore::load(storage.clone());
    store.record(item(1, "https://a.example.com")).unwrap();
    assert!(storage.value().is_some());

    store.clear().unwrap();
    assert!(store.items().is_empty());
    assert_eq!(storage.value(), None);
}

#[test]
fn file_storage_round_trips_across_sessions() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("history.json");

    let mut store = HistoryStore::load(FileHistoryStorage::new(&path));
    assert!(store.items().is_empty());
    store.record(item(1, "https://a.example.com")).unwrap();
    store.record(item(2, "https://b.example.com")).unwrap();
    assert!(path.is_file());

    let reloaded = HistoryStore::load(FileHistoryStorage::new(&path));
    assert_eq!(reloaded.items(), store.items());

    let mut reloaded = reloaded;
    reloaded.clear().unwrap();
    assert!(!path.exists());
    // Removing an absent value is fine.
    FileHistoryStorage::new(&path).remove().unwrap();
}

#[test]
fn corrupt_file_loads_as_empty() {
    forge_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("history.json");
    fs::write(&path, "garbage").unwrap();

    let store = HistoryStore::load(FileHistoryStorage::new(&path));
    assert!(store.items().is_empty());
}

#[test]
fn file_storage_rejects_file_as_directory() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let mut storage = FileHistoryStorage::new(blocker.join("history.json"));
    assert!(storage.write("[]").is_err());
}
