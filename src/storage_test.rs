use super::*;

fn scratch_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("seep-storage-{}-{name}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

// =============================================================
// MemoryStorage
// =============================================================

#[test]
fn memory_storage_set_get_remove() {
    let mut storage = MemoryStorage::new();
    assert!(storage.is_empty());

    storage.set(KEY_BOT_NAME, "Zed");
    assert_eq!(storage.get(KEY_BOT_NAME).as_deref(), Some("Zed"));
    assert_eq!(storage.len(), 1);

    storage.remove(KEY_BOT_NAME);
    assert_eq!(storage.get(KEY_BOT_NAME), None);
}

#[test]
fn memory_storage_with_entries() {
    let storage = MemoryStorage::with_entries([(KEY_BOT_NAME, "Zed"), (KEY_SHOPIFY_DOMAIN, "a.test")]);
    assert_eq!(storage.get(KEY_SHOPIFY_DOMAIN).as_deref(), Some("a.test"));
    assert_eq!(storage.get(KEY_SHOPIFY_TOKEN), None);
}

// =============================================================
// FileStorage
// =============================================================

#[test]
fn file_storage_missing_file_is_empty() {
    let path = scratch_path("missing");
    let storage = FileStorage::open(&path).unwrap();
    assert_eq!(storage.get(KEY_BOT_NAME), None);
}

#[test]
fn file_storage_survives_reopen() {
    let path = scratch_path("reopen");
    {
        let mut storage = FileStorage::open(&path).unwrap();
        storage.set(KEY_BOT_NAME, "Zed");
        storage.set(KEY_SHOPIFY_TOKEN, "tok");
        storage.remove(KEY_SHOPIFY_TOKEN);
    }

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get(KEY_BOT_NAME).as_deref(), Some("Zed"));
    assert_eq!(reopened.get(KEY_SHOPIFY_TOKEN), None);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn file_storage_rejects_non_string_map() {
    let path = scratch_path("garbage");
    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert!(matches!(FileStorage::open(&path), Err(StorageError::Json(_))));

    let fallback = FileStorage::open_or_empty(&path);
    assert_eq!(fallback.get(KEY_BOT_NAME), None);
    let _ = std::fs::remove_file(&path);
}
