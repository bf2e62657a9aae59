//! Persisted collections and their change notifications.
//!
//! A collection is a named, optionally bounded, ordered list of keyed
//! entries stored under one storage key. Wishlist, recently viewed and the
//! quick order list are all instances of [`PersistedCollectionStore`].

pub mod entry;
pub mod events;
pub mod store;

pub use entry::{CollectionEntry, EntryId, Keyed};
pub use events::{ChangeEvent, ChangeKind, Event, EventBus, Subscription};
pub use store::{AddOptions, AddOutcome, PersistedCollectionStore, Position};
