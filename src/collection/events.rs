//! Process-wide change notifications.
//!
//! DESIGN
//! ======
//! One [`EventBus`] is shared by every store and widget of a storefront.
//! Publishing calls each listener synchronously, in subscription order.
//! The registry lock is released before listeners run, so a listener may
//! publish, subscribe, or call back into the store that notified it.
//!
//! A [`Subscription`] detaches its listener when dropped or when
//! [`Subscription::unsubscribe`] is called.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use super::entry::EntryId;
use crate::notice::Notice;

// =============================================================================
// EVENTS
// =============================================================================

/// What a committed collection mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Added(EntryId),
    Updated(EntryId),
    Removed(EntryId),
    Cleared,
}

/// Emitted once after every committed collection mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Collection name (not the storage key).
    pub collection: String,
    pub kind: ChangeKind,
    /// Collection length after the mutation.
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CollectionChanged(ChangeEvent),
    CartUpdated { item_count: u32, total_price: u64 },
    Notice(Notice),
}

// =============================================================================
// BUS
// =============================================================================

pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every published event.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription { id, registry: Arc::downgrade(&self.registry), active: true }
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn publish(&self, event: &Event) {
        let listeners: Vec<Listener> = lock(&self.registry)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

fn lock(registry: &Mutex<Registry>) -> std::sync::MutexGuard<'_, Registry> {
    registry
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Handle for a registered listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    active: bool,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}

impl Subscription {
    /// Detach the listener now.
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    /// Keep the listener registered for the lifetime of the bus.
    pub fn detach(mut self) {
        self.active = false;
    }

    fn remove(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry)
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
