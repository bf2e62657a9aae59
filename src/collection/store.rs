//! Persisted collection store: the single source of truth for one list.
//!
//! DESIGN
//! ======
//! A store owns one storage key. The list is read lazily on first access,
//! kept in memory, and written through to storage after every mutation.
//! Each committed mutation publishes exactly one [`ChangeEvent`] on the
//! shared bus after the state lock is released, so listeners can read the
//! store (or mutate it) from inside the callback.
//!
//! Clones share state: every widget and view holding a clone of the same
//! store sees the same list.
//!
//! ERROR HANDLING
//! ==============
//! Storage is best-effort. Corrupt or unreadable data loads as an empty
//! list. A failed write leaves the in-memory mutation in place and flips
//! the store into degraded (session-only) mode; the next successful write
//! clears it. No storage failure is ever returned to callers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::entry::{EntryId, Keyed};
use super::events::{ChangeEvent, ChangeKind, Event, EventBus, Subscription};
use crate::error::ErrorCode;
use crate::storage::StorageBackend;

// =============================================================================
// OPTIONS
// =============================================================================

/// Which end of the list new entries go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Newest first (recency lists). Overflow evicts from the back.
    Front,
    /// Append (set-like lists). Overflow evicts from the front.
    #[default]
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddOptions {
    /// Upper bound on the list length. `None` means unbounded.
    pub max: Option<usize>,
    pub position: Position,
    /// Move an entry that is already present to `position` on re-add.
    pub move_existing: bool,
}

impl AddOptions {
    /// Unbounded, append, re-adds keep their place.
    #[must_use]
    pub const fn set_like() -> Self {
        Self { max: None, position: Position::Back, move_existing: false }
    }

    /// Bounded, newest first, re-adds move to the front.
    #[must_use]
    pub const fn recency(max: usize) -> Self {
        Self { max: Some(max), position: Position::Front, move_existing: true }
    }

    #[must_use]
    pub const fn with_max(mut self, max: Option<usize>) -> Self {
        self.max = max;
        self
    }
}

/// Result of an `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    Updated,
    /// The entry was not stored: its id was empty, or the bound evicted it.
    Ignored,
}

// =============================================================================
// STORE
// =============================================================================

struct StoreState<T> {
    items: Vec<T>,
    loaded: bool,
    degraded: bool,
}

pub struct PersistedCollectionStore<T: Keyed> {
    name: String,
    key: String,
    storage: Arc<dyn StorageBackend>,
    bus: EventBus,
    defaults: AddOptions,
    state: Arc<Mutex<StoreState<T>>>,
}

impl<T: Keyed> Clone for PersistedCollectionStore<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            key: self.key.clone(),
            storage: Arc::clone(&self.storage),
            bus: self.bus.clone(),
            defaults: self.defaults,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Keyed> fmt::Debug for PersistedCollectionStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCollectionStore")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("backend", &self.storage.name())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl<T: Keyed> PersistedCollectionStore<T> {
    /// Create a store for collection `name` persisted under `key`.
    ///
    /// Nothing is read until the first access.
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        storage: Arc<dyn StorageBackend>,
        bus: EventBus,
        defaults: AddOptions,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            storage,
            bus,
            defaults,
            state: Arc::new(Mutex::new(StoreState { items: Vec::new(), loaded: false, degraded: false })),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn defaults(&self) -> AddOptions {
        self.defaults
    }

    /// `true` after a storage write failed and no later write succeeded.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.lock().degraded
    }

    /// Read the collection from storage, replacing the in-memory copy.
    ///
    /// Missing or corrupt data yields an empty list. In degraded mode the
    /// in-memory list is newer than storage and is kept as-is.
    pub fn load(&self) -> Vec<T> {
        let mut state = self.lock();
        if state.degraded {
            debug!(collection = %self.name, "degraded; keeping in-memory list over storage");
        } else {
            state.items = self.read_storage();
        }
        state.loaded = true;
        state.items.clone()
    }

    /// Upsert with the store's default options.
    pub fn add(&self, item: T) -> AddOutcome {
        self.add_with(item, self.defaults)
    }

    /// Upsert `item` by key.
    ///
    /// An existing entry is merged with `item` (and moved when
    /// `opts.move_existing`); a new one is inserted at `opts.position`.
    /// Entries beyond `opts.max` are evicted from the opposite end.
    pub fn add_with(&self, item: T, opts: AddOptions) -> AddOutcome {
        let id = item.key().clone();
        if id.is_empty() {
            warn!(collection = %self.name, "ignoring entry with empty id");
            return AddOutcome::Ignored;
        }

        let (outcome, len) = {
            let mut state = self.loaded();
            let mut outcome = match state.items.iter().position(|e| e.key() == &id) {
                Some(index) if opts.move_existing => {
                    let mut existing = state.items.remove(index);
                    existing.merge(item);
                    insert_at(&mut state.items, existing, opts.position);
                    AddOutcome::Updated
                }
                Some(index) => {
                    state.items[index].merge(item);
                    AddOutcome::Updated
                }
                None => {
                    insert_at(&mut state.items, item, opts.position);
                    AddOutcome::Inserted
                }
            };

            let evicted = evict(&mut state.items, opts.max, opts.position);
            if evicted > 0 {
                debug!(collection = %self.name, evicted, "evicted entries over bound");
            }
            if outcome == AddOutcome::Inserted && !state.items.iter().any(|e| e.key() == &id) {
                debug!(collection = %self.name, id = %id, "new entry evicted by bound");
                if evicted <= 1 {
                    return AddOutcome::Ignored;
                }
                outcome = AddOutcome::Ignored;
            }

            self.persist(&mut state);
            (outcome, state.items.len())
        };

        let kind = match outcome {
            AddOutcome::Inserted => ChangeKind::Added(id),
            _ => ChangeKind::Updated(id),
        };
        self.emit(kind, len);
        outcome
    }

    /// Remove the entry with `id`. Returns `false` (and does nothing) when absent.
    pub fn remove(&self, id: impl Into<EntryId>) -> bool {
        let id = id.into();
        let len = {
            let mut state = self.loaded();
            let Some(index) = state.items.iter().position(|e| e.key() == &id) else {
                return false;
            };
            state.items.remove(index);
            self.persist(&mut state);
            state.items.len()
        };
        self.emit(ChangeKind::Removed(id), len);
        true
    }

    /// Remove the entry at `index` in list order.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let (removed, len) = {
            let mut state = self.loaded();
            if index >= state.items.len() {
                return None;
            }
            let removed = state.items.remove(index);
            self.persist(&mut state);
            (removed, state.items.len())
        };
        self.emit(ChangeKind::Removed(removed.key().clone()), len);
        Some(removed)
    }

    /// Add `item` if absent, remove it if present. Returns whether it is
    /// present afterwards.
    pub fn toggle(&self, item: T) -> bool {
        if self.has(item.key()) {
            self.remove(item.key());
            false
        } else {
            self.add(item) != AddOutcome::Ignored
        }
    }

    /// Apply `f` to the entry with `id` in place. `f` must not change the key.
    pub fn update(&self, id: impl Into<EntryId>, f: impl FnOnce(&mut T)) -> bool {
        let id = id.into();
        let len = {
            let mut state = self.loaded();
            let Some(entry) = state.items.iter_mut().find(|e| e.key() == &id) else {
                return false;
            };
            f(entry);
            debug_assert_eq!(entry.key(), &id, "update must not change the entry key");
            self.persist(&mut state);
            state.items.len()
        };
        self.emit(ChangeKind::Updated(id), len);
        true
    }

    /// Remove every entry.
    pub fn clear(&self) {
        {
            let mut state = self.loaded();
            state.items.clear();
            self.persist(&mut state);
        }
        self.emit(ChangeKind::Cleared, 0);
    }

    #[must_use]
    pub fn has(&self, id: impl Into<EntryId>) -> bool {
        let id = id.into();
        self.loaded().items.iter().any(|e| e.key() == &id)
    }

    #[must_use]
    pub fn get(&self, id: impl Into<EntryId>) -> Option<T> {
        let id = id.into();
        self.loaded()
            .items
            .iter()
            .find(|e| e.key() == &id)
            .cloned()
    }

    /// Copy of the entries in list order.
    #[must_use]
    pub fn list(&self) -> Vec<T> {
        self.loaded().items.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded().items.is_empty()
    }

    /// Register `listener` for this collection's change events only.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let name = self.name.clone();
        self.bus.subscribe(move |event| {
            if let Event::CollectionChanged(change) = event {
                if change.collection == name {
                    listener(change);
                }
            }
        })
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, StoreState<T>> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Lock the state, reading storage first if this is the first access.
    fn loaded(&self) -> MutexGuard<'_, StoreState<T>> {
        let mut state = self.lock();
        if !state.loaded {
            state.items = self.read_storage();
            state.loaded = true;
        }
        state
    }

    fn read_storage(&self) -> Vec<T> {
        match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => decode_items(&self.key, &raw, self.defaults),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, code = e.error_code(), error = %e, "collection read failed; starting empty");
                Vec::new()
            }
        }
    }

    fn persist(&self, state: &mut StoreState<T>) {
        let encoded = match serde_json::to_string(&state.items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %self.key, error = %e, "collection encode failed; continuing in memory");
                state.degraded = true;
                return;
            }
        };

        match self.storage.set_item(&self.key, &encoded) {
            Ok(()) => {
                if state.degraded {
                    info!(key = %self.key, "collection writes recovered");
                }
                state.degraded = false;
            }
            Err(e) => {
                warn!(
                    key = %self.key,
                    backend = self.storage.name(),
                    code = e.error_code(),
                    error = %e,
                    "collection write failed; continuing in memory"
                );
                state.degraded = true;
            }
        }
    }

    fn emit(&self, kind: ChangeKind, len: usize) {
        self.bus.publish(&Event::CollectionChanged(ChangeEvent { collection: self.name.clone(), kind, len }));
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn insert_at<T>(items: &mut Vec<T>, item: T, position: Position) {
    match position {
        Position::Front => items.insert(0, item),
        Position::Back => items.push(item),
    }
}

/// Trim `items` to `max`, dropping from the end opposite `position`.
fn evict<T>(items: &mut Vec<T>, max: Option<usize>, position: Position) -> usize {
    let Some(max) = max else {
        return 0;
    };
    if items.len() <= max {
        return 0;
    }
    let excess = items.len() - max;
    match position {
        Position::Front => items.truncate(max),
        Position::Back => {
            items.drain(..excess);
        }
    }
    excess
}

/// Decode a stored JSON array, skipping bad items and duplicate keys.
fn decode_items<T: Keyed>(key: &str, raw: &str, defaults: AddOptions) -> Vec<T> {
    let values = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(_) => {
            warn!(key, "stored collection is not an array; starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = %e, "stored collection is corrupt; starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<T> = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value).map(Keyed::normalize) {
            Ok(None) => {
                warn!(key, index, "skipping invalid stored item");
            }
            Ok(Some(item)) if item.key().is_empty() => {
                warn!(key, index, "skipping stored item with empty id");
            }
            Ok(Some(item)) => {
                if items.iter().any(|e| e.key() == item.key()) {
                    debug!(key, index, id = %item.key(), "skipping duplicate stored item");
                } else {
                    items.push(item);
                }
            }
            Err(e) => {
                warn!(key, index, error = %e, "skipping undecodable stored item");
            }
        }
    }

    evict(&mut items, defaults.max, defaults.position);
    items
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
