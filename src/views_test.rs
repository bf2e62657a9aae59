use super::*;
use crate::collection::{AddOptions, CollectionEntry};
use crate::storage::{MemoryStorage, StorageBackend};

fn wishlist(bus: &EventBus) -> PersistedCollectionStore<CollectionEntry> {
    let storage: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
    PersistedCollectionStore::new("wishlist", "umino_wishlist", storage, bus.clone(), AddOptions::set_like())
}

#[test]
fn badge_tracks_collection_size() {
    let bus = EventBus::new();
    let store = wishlist(&bus);
    let badge = CountBadge::collection_size(&store);
    assert_eq!(badge.state(), BadgeState { count: 0, visible: false });

    store.add(CollectionEntry::new("p1"));
    store.add(CollectionEntry::new("p2"));
    assert_eq!(badge.state(), BadgeState { count: 2, visible: true });

    store.clear();
    assert!(!badge.is_visible());
}

#[test]
fn badge_ignores_other_collections() {
    let bus = EventBus::new();
    let store = wishlist(&bus);
    let storage: Arc<dyn StorageBackend> = Arc::new(MemoryStorage::new());
    let other: PersistedCollectionStore<CollectionEntry> =
        PersistedCollectionStore::new("recently_viewed", "umino_recently_viewed", storage, bus.clone(), AddOptions::recency(10));
    let badge = CountBadge::collection_size(&store);

    other.add(CollectionEntry::new("x"));
    assert_eq!(badge.count(), 0);
}

#[test]
fn dropped_badge_detaches() {
    let bus = EventBus::new();
    let store = wishlist(&bus);
    let badge = CountBadge::collection_size(&store);
    assert_eq!(bus.listener_count(), 1);
    drop(badge);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn cart_badge_follows_cart_updates() {
    let bus = EventBus::new();
    let badge = CountBadge::cart(&bus, 0);
    assert!(!badge.is_visible());

    bus.publish(&Event::CartUpdated { item_count: 3, total_price: 4500 });
    assert_eq!(badge.state(), BadgeState { count: 3, visible: true });
}

#[test]
fn list_view_rerenders_per_change() {
    let bus = EventBus::new();
    let store = wishlist(&bus);
    store.add(CollectionEntry::new("p1"));

    let view = ListView::new(&store);
    assert_eq!(view.renders(), 1);
    assert_eq!(view.items().len(), 1);

    store.add(CollectionEntry::new("p2"));
    store.remove("p1");
    assert_eq!(view.renders(), 3);
    let ids: Vec<String> = view.items().iter().map(|e| e.id.to_string()).collect();
    assert_eq!(ids, vec!["p2"]);
    assert!(!view.is_empty());
}

#[test]
fn wishlist_button_label_follows_membership() {
    let bus = EventBus::new();
    let store = wishlist(&bus);
    let button = WishlistButton::new(42_u64, &store);
    assert_eq!(button.label(), ADD_TO_WISHLIST);

    store.add(CollectionEntry::new("42"));
    assert!(button.is_active());
    assert_eq!(button.label(), REMOVE_FROM_WISHLIST);
}
