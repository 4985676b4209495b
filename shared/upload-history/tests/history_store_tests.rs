use upload_history::{
    FileBackend, HistoryEntry, HistoryStore, MemoryBackend, UploadHistory, MAX_HISTORY_ENTRIES,
};

fn entry(id: &str) -> HistoryEntry {
    HistoryEntry::new(id, format!("https://i.podu.pics/{id}"))
}

#[tokio::test]
async fn test_empty_store_loads_empty_history() {
    let store = HistoryStore::spawn(MemoryBackend::new());

    let history = store.load().await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_append_persists_json_array() {
    let backend = MemoryBackend::new();
    let store = HistoryStore::spawn(backend.clone());

    let history = store.append(entry("V1StGXR8_Z")).await.unwrap();
    assert_eq!(history.len(), 1);

    let raw = backend.raw().expect("history should be persisted");
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["id"], "V1StGXR8_Z");
    assert_eq!(stored[0]["url"], "https://i.podu.pics/V1StGXR8_Z");
    assert!(stored[0]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_concurrent_appends_are_not_lost() {
    let backend = MemoryBackend::new();
    let store = HistoryStore::spawn(backend.clone());

    let handles: Vec<_> = (0..MAX_HISTORY_ENTRIES)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append(entry(&format!("upload-{i}"))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = store.load().await.unwrap();
    assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
    for i in 0..MAX_HISTORY_ENTRIES {
        let id = format!("upload-{i}");
        assert!(
            history.entries().iter().any(|e| e.id == id),
            "{id} was lost"
        );
    }
}

#[tokio::test]
async fn test_many_concurrent_appends_stay_capped() {
    let store = HistoryStore::spawn(MemoryBackend::new());

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append(entry(&format!("upload-{i}"))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.load().await.unwrap().len(), MAX_HISTORY_ENTRIES);
}

#[tokio::test]
async fn test_reupload_moves_entry_to_front() {
    let store = HistoryStore::spawn(MemoryBackend::new());

    store.append(entry("a")).await.unwrap();
    store.append(entry("b")).await.unwrap();
    let history = store.append(entry("a")).await.unwrap();

    let ids: Vec<_> = history.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let backend = MemoryBackend::new();
    let store = HistoryStore::spawn(backend.clone());

    store.append(entry("a")).await.unwrap();
    store.clear().await.unwrap();

    assert!(backend.raw().is_none());
    assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_replaces_history() {
    let store = HistoryStore::spawn(MemoryBackend::new());
    store.append(entry("old")).await.unwrap();

    let mut replacement = UploadHistory::new();
    replacement.insert(entry("new"));
    store.save(replacement.clone()).await.unwrap();

    assert_eq!(store.load().await.unwrap(), replacement);
}

#[tokio::test]
async fn test_corrupt_history_loads_empty_and_recovers() {
    let backend = MemoryBackend::with_value("{definitely not json");
    let store = HistoryStore::spawn(backend.clone());

    assert!(store.load().await.unwrap().is_empty());

    let history = store.append(entry("fresh")).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(backend.raw().unwrap().contains("fresh"));
}

#[tokio::test]
async fn test_file_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = HistoryStore::spawn(FileBackend::new(dir.path()));
        store.append(entry("first")).await.unwrap();
        store.append(entry("second")).await.unwrap();
    }

    let store = HistoryStore::spawn(FileBackend::new(dir.path()));
    let history = store.load().await.unwrap();

    let ids: Vec<_> = history.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["second", "first"]);
    assert!(dir.path().join("podu_history.json").exists());
}
