//! Cart drawer: the cached cart snapshot and its quantity controls.
//!
//! DESIGN
//! ======
//! Quantity changes are optimistic. The cached snapshot is edited at once,
//! then the absolute new quantity is sent. A success replaces the snapshot
//! with the storefront's cart; a failure restores the previous snapshot.
//!
//! Every request takes a sequence number when it starts. A response is
//! applied only if no later request has started since, so a slow response
//! can never overwrite a newer cart or a pending optimistic edit. A failed
//! request rolls back only while it is still the latest one issued.
//!
//! Every snapshot change publishes `Event::CartUpdated`.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::{Outcome, WidgetContext, WidgetError};
use crate::api::Cart;
use crate::collection::Event;
use crate::error::ErrorCode;
use crate::validation::DEFAULT_MAX_QUANTITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Open,
    Close,
    Refresh,
    Increase(String),
    Decrease(String),
    Remove(String),
    SetQuantity { key: String, quantity: u32 },
}

#[derive(Debug, Default)]
struct DrawerState {
    open: bool,
    cart: Option<Cart>,
    /// Last sequence number handed out.
    issued: u64,
}

#[derive(Debug, Clone)]
pub struct CartDrawer {
    ctx: WidgetContext,
    state: Arc<Mutex<DrawerState>>,
}

impl CartDrawer {
    #[must_use]
    pub fn new(ctx: WidgetContext) -> Self {
        Self { ctx, state: Arc::new(Mutex::new(DrawerState::default())) }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Displayed cart, if one has been loaded.
    #[must_use]
    pub fn cart(&self) -> Option<Cart> {
        self.lock().cart.clone()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lock().cart.as_ref().map_or(0, |c| c.item_count)
    }

    /// # Errors
    ///
    /// Returns the API error of a failed refresh or quantity change. A
    /// failed change has already been rolled back.
    pub async fn handle(&self, action: CartAction) -> Result<Outcome, WidgetError> {
        match action {
            CartAction::Open => self.open().await?,
            CartAction::Close => self.lock().open = false,
            CartAction::Refresh => {
                self.refresh().await?;
            }
            CartAction::Increase(key) => {
                if let Some(current) = self.line_quantity(&key).await? {
                    self.change(&key, current.saturating_add(1).min(DEFAULT_MAX_QUANTITY)).await?;
                }
            }
            CartAction::Decrease(key) => {
                if let Some(current) = self.line_quantity(&key).await? {
                    self.change(&key, current.saturating_sub(1)).await?;
                }
            }
            CartAction::Remove(key) => self.change(&key, 0).await?,
            CartAction::SetQuantity { key, quantity } => {
                self.change(&key, quantity.min(DEFAULT_MAX_QUANTITY)).await?;
            }
        }
        Ok(Outcome::Done)
    }

    /// Show the drawer, loading the cart first if none is cached.
    ///
    /// # Errors
    ///
    /// Returns the API error if the initial load fails. The drawer opens anyway.
    pub async fn open(&self) -> Result<(), WidgetError> {
        let needs_load = {
            let mut state = self.lock();
            state.open = true;
            state.cart.is_none()
        };
        if needs_load {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Reload the cart from the storefront.
    ///
    /// # Errors
    ///
    /// Returns the API error; the displayed cart is left unchanged.
    pub async fn refresh(&self) -> Result<Cart, WidgetError> {
        let seq = self.next_seq();
        let cart = self.ctx.api.cart().await?;
        self.apply(seq, cart.clone());
        Ok(cart)
    }

    /// Set the absolute quantity of line `key`; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns the API error after rolling back the optimistic edit.
    pub async fn change(&self, key: &str, quantity: u32) -> Result<(), WidgetError> {
        let needs_load = self.lock().cart.is_none();
        if needs_load {
            self.refresh().await?;
        }

        let (seq, previous, optimistic) = {
            let mut state = self.lock();
            let Some(cart) = state.cart.as_mut() else {
                return Ok(());
            };
            let previous = cart.clone();
            if !cart.set_line_quantity(key, quantity) {
                warn!(key, "cart change for unknown line");
                return Ok(());
            }
            let optimistic = cart.clone();
            state.issued += 1;
            (state.issued, previous, optimistic)
        };
        self.publish(&optimistic);

        match self.ctx.api.change_line(key, quantity).await {
            Ok(cart) => {
                self.apply(seq, cart);
                Ok(())
            }
            Err(e) => {
                warn!(key, quantity, seq, code = e.error_code(), error = %e, "cart change failed");
                self.rollback(seq, previous);
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, DrawerState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_seq(&self) -> u64 {
        let mut state = self.lock();
        state.issued += 1;
        state.issued
    }

    async fn line_quantity(&self, key: &str) -> Result<Option<u32>, WidgetError> {
        let needs_load = self.lock().cart.is_none();
        if needs_load {
            self.refresh().await?;
        }
        let quantity = self
            .lock()
            .cart
            .as_ref()
            .and_then(|c| c.line(key))
            .map(|l| l.quantity);
        if quantity.is_none() {
            warn!(key, "cart action for unknown line");
        }
        Ok(quantity)
    }

    /// Display `cart` unless a later request has started since `seq`.
    fn apply(&self, seq: u64, cart: Cart) -> bool {
        {
            let mut state = self.lock();
            if seq < state.issued {
                debug!(seq, issued = state.issued, "discarding stale cart response");
                return false;
            }
            state.cart = Some(cart.clone());
        }
        self.publish(&cart);
        true
    }

    fn rollback(&self, seq: u64, previous: Cart) {
        {
            let mut state = self.lock();
            if state.issued != seq {
                debug!(seq, issued = state.issued, "newer cart request in flight; skipping rollback");
                return;
            }
            state.cart = Some(previous.clone());
        }
        self.publish(&previous);
    }

    fn publish(&self, cart: &Cart) {
        self.ctx.bus.publish(&Event::CartUpdated { item_count: cart.item_count, total_price: cart.total_price });
    }
}

#[cfg(test)]
#[path = "cart_drawer_test.rs"]
mod tests;
