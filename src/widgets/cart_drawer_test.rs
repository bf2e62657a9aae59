use super::*;
use crate::widgets::test_support::{MockStorefront, UNIT_PRICE, context};

use std::time::Duration;

const KEY: &str = "11:k";

fn drawer_with_line(quantity: u32) -> (CartDrawer, Arc<MockStorefront>) {
    let api = MockStorefront::new();
    api.with_line(KEY, 11, quantity);
    (CartDrawer::new(context(&api)), api)
}

fn record_counts(drawer: &CartDrawer) -> (Arc<Mutex<Vec<u32>>>, crate::collection::Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let seen = Arc::clone(&seen);
        drawer.ctx.bus.subscribe(move |event| {
            if let Event::CartUpdated { item_count, .. } = event {
                seen.lock().unwrap().push(*item_count);
            }
        })
    };
    (seen, sub)
}

#[tokio::test]
async fn open_loads_cart_once() {
    let (drawer, api) = drawer_with_line(2);
    drawer.handle(CartAction::Open).await.unwrap();
    assert!(drawer.is_open());
    assert_eq!(drawer.item_count(), 2);

    drawer.handle(CartAction::Close).await.unwrap();
    drawer.handle(CartAction::Open).await.unwrap();
    assert_eq!(api.calls(), vec!["cart"]);

    drawer.handle(CartAction::Close).await.unwrap();
    assert!(!drawer.is_open());
}

#[tokio::test]
async fn increase_sends_absolute_quantity() {
    let (drawer, api) = drawer_with_line(2);
    drawer.handle(CartAction::Increase(KEY.into())).await.unwrap();

    assert_eq!(api.calls(), vec!["cart", "change 11:k=3"]);
    let cart = drawer.cart().unwrap();
    assert_eq!(cart.line(KEY).unwrap().quantity, 3);
    assert_eq!(cart.total_price, 3 * UNIT_PRICE);
}

#[tokio::test]
async fn decrease_from_one_removes_line() {
    let (drawer, api) = drawer_with_line(1);
    drawer.handle(CartAction::Refresh).await.unwrap();
    drawer.handle(CartAction::Decrease(KEY.into())).await.unwrap();

    assert!(drawer.cart().unwrap().items.is_empty());
    assert!(api.cart_snapshot().line(KEY).is_none());
}

#[tokio::test]
async fn remove_then_refresh_has_no_line() {
    let (drawer, api) = drawer_with_line(2);
    drawer.handle(CartAction::Remove(KEY.into())).await.unwrap();
    drawer.handle(CartAction::Refresh).await.unwrap();
    assert!(drawer.cart().unwrap().line(KEY).is_none());
    assert_eq!(api.calls().last().map(String::as_str), Some("cart"));
}

#[tokio::test]
async fn optimistic_update_is_published_then_confirmed() {
    let (drawer, _api) = drawer_with_line(1);
    drawer.handle(CartAction::Refresh).await.unwrap();
    let (seen, _sub) = record_counts(&drawer);

    drawer
        .handle(CartAction::SetQuantity { key: KEY.into(), quantity: 4 })
        .await
        .unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![4, 4]);
}

#[tokio::test]
async fn failed_change_rolls_back() {
    let (drawer, api) = drawer_with_line(2);
    drawer.handle(CartAction::Refresh).await.unwrap();
    let before = drawer.cart().unwrap();
    let (seen, _sub) = record_counts(&drawer);

    api.fail_with(422, "Only 2 left in stock");
    let err = drawer
        .handle(CartAction::SetQuantity { key: KEY.into(), quantity: 5 })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Only 2 left in stock");
    assert_eq!(drawer.cart().unwrap(), before);
    assert_eq!(*seen.lock().unwrap(), vec![5, 2]);
}

#[tokio::test]
async fn stale_response_is_discarded() {
    let (drawer, api) = drawer_with_line(1);
    drawer.handle(CartAction::Refresh).await.unwrap();
    api.delay_change(2, Duration::from_millis(100));

    let slow = drawer.change(KEY, 2);
    let fast = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        drawer.change(KEY, 3).await
    };
    let (slow, fast) = tokio::join!(slow, fast);
    slow.unwrap();
    fast.unwrap();

    assert_eq!(drawer.cart().unwrap().line(KEY).unwrap().quantity, 3);
}

#[tokio::test]
async fn unknown_line_is_ignored() {
    let (drawer, api) = drawer_with_line(1);
    drawer.handle(CartAction::Increase("nope".into())).await.unwrap();
    drawer
        .handle(CartAction::SetQuantity { key: "nope".into(), quantity: 2 })
        .await
        .unwrap();
    assert_eq!(api.calls(), vec!["cart"]);
}

#[tokio::test]
async fn set_quantity_is_capped() {
    let (drawer, api) = drawer_with_line(1);
    drawer
        .handle(CartAction::SetQuantity { key: KEY.into(), quantity: 5000 })
        .await
        .unwrap();
    assert_eq!(api.calls().last().map(String::as_str), Some("change 11:k=999"));
}
