//! In-memory `StorefrontApi` for widget tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{AddLine, ApiError, Cart, LineItem, Product, StorefrontApi, SuggestedProduct, Variant};
use crate::collection::EventBus;
use crate::notice::{DEFAULT_NOTICE_TTL, Notice, Notifier};

use super::WidgetContext;

pub const UNIT_PRICE: u64 = 1000;

#[derive(Default)]
struct MockState {
    cart: Cart,
    products: HashMap<String, Product>,
    /// Every call fails with this status and message while set.
    failure: Option<(u16, String)>,
    /// Delay applied to `change_line` responses, by requested quantity.
    change_delays: HashMap<u32, Duration>,
    /// Delay applied to `suggest` responses, by query.
    suggest_delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct MockStorefront {
    state: Mutex<MockState>,
}

impl MockStorefront {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_product(&self, handle: &str, id: u64, variants: &[(u64, bool)]) {
        let product = Product {
            id,
            title: format!("Product {handle}"),
            handle: handle.to_owned(),
            price: UNIT_PRICE,
            variants: variants
                .iter()
                .map(|&(id, available)| Variant { id, available, price: UNIT_PRICE, ..Variant::default() })
                .collect(),
            images: vec![format!("//cdn.shop.test/{handle}.jpg")],
            featured_image: None,
        };
        self.lock().products.insert(handle.to_owned(), product);
    }

    pub fn with_line(&self, key: &str, variant_id: u64, quantity: u32) {
        let mut state = self.lock();
        state.cart.items.push(LineItem {
            key: key.to_owned(),
            id: variant_id,
            price: UNIT_PRICE,
            ..LineItem::default()
        });
        state.cart.set_line_quantity(key, quantity);
    }

    pub fn fail_with(&self, status: u16, message: &str) {
        self.lock().failure = Some((status, message.to_owned()));
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    pub fn delay_change(&self, quantity: u32, delay: Duration) {
        self.lock().change_delays.insert(quantity, delay);
    }

    pub fn delay_suggest(&self, query: &str, delay: Duration) {
        self.lock().suggest_delays.insert(query.to_owned(), delay);
    }

    pub fn cart_snapshot(&self) -> Cart {
        self.lock().cart.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        match &state.failure {
            Some((status, message)) => Err(ApiError::Status { status: *status, message: message.clone() }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl StorefrontApi for MockStorefront {
    async fn cart(&self) -> Result<Cart, ApiError> {
        self.record("cart".into())?;
        Ok(self.cart_snapshot())
    }

    async fn add_items(&self, lines: &[AddLine]) -> Result<Vec<LineItem>, ApiError> {
        let ids: Vec<String> = lines
            .iter()
            .map(|l| format!("{}x{}", l.id, l.quantity))
            .collect();
        self.record(format!("add {}", ids.join(",")))?;

        let mut state = self.lock();
        let mut added = Vec::new();
        for line in lines {
            let key = format!("{}:k", line.id);
            let existing = state.cart.line(&key).map_or(0, |l| l.quantity);
            if existing == 0 {
                state.cart.items.push(LineItem { key: key.clone(), id: line.id, price: UNIT_PRICE, ..LineItem::default() });
            }
            state.cart.set_line_quantity(&key, existing.saturating_add(line.quantity));
            added.extend(state.cart.line(&key).cloned());
        }
        Ok(added)
    }

    async fn change_line(&self, key: &str, quantity: u32) -> Result<Cart, ApiError> {
        self.record(format!("change {key}={quantity}"))?;
        let (result, delay) = {
            let mut state = self.lock();
            let result = if state.cart.set_line_quantity(key, quantity) {
                Ok(state.cart.clone())
            } else {
                Err(ApiError::Status { status: 400, message: "no valid id or line parameter".into() })
            };
            (result, state.change_delays.get(&quantity).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn product(&self, handle: &str) -> Result<Product, ApiError> {
        self.record(format!("product {handle}"))?;
        self.lock()
            .products
            .get(handle)
            .cloned()
            .ok_or(ApiError::Status { status: 404, message: "Not Found".into() })
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestedProduct>, ApiError> {
        self.record(format!("suggest {query}"))?;
        let delay = self.lock().suggest_delays.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok((1..=10_u64)
            .map(|i| SuggestedProduct {
                id: i,
                title: format!("{query} {i}"),
                handle: format!("{query}-{i}"),
                url: format!("/products/{query}-{i}"),
                ..SuggestedProduct::default()
            })
            .take(limit)
            .collect())
    }
}

/// Context over `api` with a fresh bus and notifier.
pub fn context(api: &Arc<MockStorefront>) -> WidgetContext {
    let bus = EventBus::new();
    let notifier = Notifier::new(bus.clone(), DEFAULT_NOTICE_TTL);
    let api: Arc<dyn StorefrontApi> = api.clone();
    WidgetContext::new(api, notifier, bus)
}

pub fn latest_notice(ctx: &WidgetContext) -> Option<Notice> {
    ctx.notifier.latest()
}
