//! Browser `localStorage` backend (`web` feature).
//!
//! Looks the storage object up on every call instead of holding it, so the
//! backend stays `Send + Sync` and tolerates storage being revoked mid-session.

use super::{StorageBackend, StorageError};

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

impl BrowserStorage {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            _ => Err(StorageError::Unavailable),
        }
    }
}

impl StorageBackend for BrowserStorage {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // `setItem` throws `QuotaExceededError` when full; the JS value carries
        // no byte counts, so report the attempted size against an unknown quota.
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::QuotaExceeded { needed: key.len() + value.len(), quota: 0 })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}
