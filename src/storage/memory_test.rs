use super::*;

#[test]
fn memory_get_missing_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get_item("absent").unwrap(), None);
}

#[test]
fn memory_set_then_get() {
    let storage = MemoryStorage::new();
    storage.set_item("umino_wishlist", "[\"1\"]").unwrap();
    assert_eq!(storage.get_item("umino_wishlist").unwrap().as_deref(), Some("[\"1\"]"));
}

#[test]
fn memory_remove_absent_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove_item("nothing").is_ok());
}

#[test]
fn memory_quota_rejects_oversized_write() {
    let storage = MemoryStorage::with_quota(10);
    let err = storage.set_item("key", "0123456789").unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { needed: 13, quota: 10 }));
    assert_eq!(storage.raw("key"), None);
}

#[test]
fn memory_quota_counts_replacement_not_previous_value() {
    let storage = MemoryStorage::with_quota(8);
    storage.set_item("k", "1234567").unwrap();
    // Replacing the same key must not count the old value.
    storage.set_item("k", "7654321").unwrap();
    assert_eq!(storage.raw("k").as_deref(), Some("7654321"));
}

#[test]
fn memory_disabled_fails_every_call() {
    let storage = MemoryStorage::disabled();
    assert!(matches!(storage.get_item("k"), Err(StorageError::Unavailable)));
    assert!(matches!(storage.set_item("k", "v"), Err(StorageError::Unavailable)));
    assert!(matches!(storage.remove_item("k"), Err(StorageError::Unavailable)));
}

#[test]
fn memory_can_be_reenabled() {
    let storage = MemoryStorage::disabled();
    storage.set_disabled(false);
    storage.set_item("k", "v").unwrap();
    assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn collection_key_joins_namespace_and_name() {
    assert_eq!(collection_key("umino", "wishlist"), "umino_wishlist");
    assert_eq!(collection_key("", "wishlist"), "wishlist");
}

#[test]
fn storage_error_codes_are_stable() {
    assert_eq!(StorageError::Unavailable.error_code(), "E_STORAGE_UNAVAILABLE");
    assert_eq!(StorageError::QuotaExceeded { needed: 1, quota: 0 }.error_code(), "E_STORAGE_QUOTA");
    assert!(!StorageError::Unavailable.retryable());
}
