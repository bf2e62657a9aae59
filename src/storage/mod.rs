//! Durable key/value storage backends.
//!
//! DESIGN
//! ======
//! Backends store raw strings under string keys, mirroring the browser
//! `localStorage` contract. Encoding is the caller's job: collections
//! serialize themselves to JSON before calling [`StorageBackend::set_item`].
//!
//! All calls are synchronous. Stores invoke them on every mutation, so an
//! implementation must not block for a meaningful duration.
//!
//! ERROR HANDLING
//! ==============
//! Backends report failures as [`StorageError`]. They never recover on
//! their own; the collection store decides what a failed write means
//! (see `collection::store`).

mod file;
mod memory;

#[cfg(feature = "web")]
mod browser;

#[cfg(feature = "web")]
pub use browser::BrowserStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or not reachable (private mode, denied access).
    #[error("storage unavailable")]
    Unavailable,

    /// Writing would exceed the backend's byte quota.
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The backing file could not be read or written.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage.
    #[error("storage encode failed: {0}")]
    Encode(String),
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable => "E_STORAGE_UNAVAILABLE",
            Self::QuotaExceeded { .. } => "E_STORAGE_QUOTA",
            Self::Io(_) => "E_STORAGE_IO",
            Self::Encode(_) => "E_STORAGE_ENCODE",
        }
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// A string key/value store with `localStorage` semantics.
pub trait StorageBackend: Send + Sync {
    /// Short backend name for logs ("memory", "file", "browser").
    fn name(&self) -> &'static str;

    /// Read the value stored under `key`. `Ok(None)` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Compose the storage key for a named collection: `<namespace>_<name>`.
#[must_use]
pub fn collection_key(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        return name.to_owned();
    }
    format!("{namespace}_{name}")
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
