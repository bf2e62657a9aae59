//! Observer view models.
//!
//! DESIGN
//! ======
//! Views own no authoritative state. Each one subscribes to the event bus,
//! re-reads its source on every matching event, and exposes the latest
//! projection for the host to render. Dropping a view detaches it.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::collection::{EntryId, Event, EventBus, Keyed, PersistedCollectionStore, Subscription};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

// =============================================================================
// COUNT BADGE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BadgeState {
    pub count: usize,
    /// Hidden at zero.
    pub visible: bool,
}

impl BadgeState {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { count, visible: count > 0 }
    }
}

/// A live count with visibility, e.g. the wishlist or cart icon badge.
#[derive(Debug)]
pub struct CountBadge {
    state: Arc<Mutex<BadgeState>>,
    _subscription: Subscription,
}

impl CountBadge {
    /// Badge showing the number of entries in `store`.
    #[must_use]
    pub fn collection_size<T: Keyed>(store: &PersistedCollectionStore<T>) -> Self {
        Self::collection(store, <[T]>::len)
    }

    /// Badge showing `count(list)` of `store`, recomputed on each change.
    #[must_use]
    pub fn collection<T, F>(store: &PersistedCollectionStore<T>, count: F) -> Self
    where
        T: Keyed,
        F: Fn(&[T]) -> usize + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(BadgeState::new(count(&store.list()))));
        let subscription = {
            let state = Arc::clone(&state);
            let source = store.clone();
            store.subscribe(move |_| {
                *lock(&state) = BadgeState::new(count(&source.list()));
            })
        };
        Self { state, _subscription: subscription }
    }

    /// Badge showing the cart item count from `CartUpdated` events.
    #[must_use]
    pub fn cart(bus: &EventBus, initial: u32) -> Self {
        let state = Arc::new(Mutex::new(BadgeState::new(initial as usize)));
        let subscription = {
            let state = Arc::clone(&state);
            bus.subscribe(move |event| {
                if let Event::CartUpdated { item_count, .. } = event {
                    *lock(&state) = BadgeState::new(*item_count as usize);
                }
            })
        };
        Self { state, _subscription: subscription }
    }

    #[must_use]
    pub fn state(&self) -> BadgeState {
        *lock(&self.state)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.state().count
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state().visible
    }
}

// =============================================================================
// LIST VIEW
// =============================================================================

struct Snapshot<T> {
    items: Vec<T>,
    renders: u64,
}

/// Latest `list()` projection of a store, e.g. a wishlist modal body.
pub struct ListView<T: Keyed> {
    snapshot: Arc<Mutex<Snapshot<T>>>,
    _subscription: Subscription,
}

impl<T: Keyed> std::fmt::Debug for ListView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = lock(&self.snapshot);
        f.debug_struct("ListView")
            .field("len", &snapshot.items.len())
            .field("renders", &snapshot.renders)
            .finish()
    }
}

impl<T: Keyed> ListView<T> {
    /// Render once now and again after every change to `store`.
    #[must_use]
    pub fn new(store: &PersistedCollectionStore<T>) -> Self {
        let snapshot = Arc::new(Mutex::new(Snapshot { items: store.list(), renders: 1 }));
        let subscription = {
            let snapshot = Arc::clone(&snapshot);
            let source = store.clone();
            store.subscribe(move |_| {
                let items = source.list();
                let mut snapshot = lock(&snapshot);
                snapshot.items = items;
                snapshot.renders += 1;
            })
        };
        Self { snapshot, _subscription: subscription }
    }

    #[must_use]
    pub fn items(&self) -> Vec<T> {
        lock(&self.snapshot).items.clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.snapshot).items.is_empty()
    }

    /// Number of times the view has rendered, including the first.
    #[must_use]
    pub fn renders(&self) -> u64 {
        lock(&self.snapshot).renders
    }
}

// =============================================================================
// WISHLIST BUTTON
// =============================================================================

pub const ADD_TO_WISHLIST: &str = "Add to wishlist";
pub const REMOVE_FROM_WISHLIST: &str = "Remove from wishlist";

/// State of a per-product wishlist toggle button.
#[derive(Debug, Clone)]
pub struct WishlistButton<T: Keyed> {
    id: EntryId,
    store: PersistedCollectionStore<T>,
}

impl<T: Keyed> WishlistButton<T> {
    #[must_use]
    pub fn new(id: impl Into<EntryId>, store: &PersistedCollectionStore<T>) -> Self {
        Self { id: id.into(), store: store.clone() }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.store.has(&self.id)
    }

    /// Button label and `aria-label` text.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_active() { REMOVE_FROM_WISHLIST } else { ADD_TO_WISHLIST }
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
