//! JSON-file storage backend.
//!
//! DESIGN
//! ======
//! The whole key space lives in one JSON object (`{"key": "value", ...}`),
//! cached in memory and rewritten on every mutation. Writes go to a temp
//! file in the same directory and are renamed over the target, so a crash
//! mid-write leaves the previous file intact.
//!
//! A missing file is an empty store. An unreadable or corrupt file is also
//! treated as empty (logged); the next write replaces it.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use super::{StorageBackend, StorageError};

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the store file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = read_items(&path);
        Self { path, items: Mutex::new(items) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let encoded = serde_json::to_vec_pretty(items).map_err(|e| StorageError::Encode(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

fn read_items(path: &Path) -> BTreeMap<String, String> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "storage file unreadable; starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "storage file corrupt; starting empty");
            BTreeMap::new()
        }
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.lock();
        let previous = items.insert(key.to_owned(), value.to_owned());
        if let Err(e) = self.flush(&items) {
            // Keep the cache consistent with what is on disk.
            match previous {
                Some(prev) => items.insert(key.to_owned(), prev),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.lock();
        let Some(previous) = items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&items) {
            items.insert(key.to_owned(), previous);
            return Err(e);
        }
        Ok(())
    }
}
