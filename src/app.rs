//! Storefront boot and action dispatch.
//!
//! DESIGN
//! ======
//! `Storefront` wires one event bus, one notifier, the three persisted
//! collections and every widget controller together. Hosts feed user input
//! in as [`Action`] values through [`Storefront::dispatch`] and render from
//! the widgets, badges and notices.
//!
//! Cross-widget effects live here and nowhere else: when any action changes
//! the remote cart, the drawer refreshes and opens.
//!
//! ERROR HANDLING
//! ==============
//! Dispatch logs every handler failure with its error code, shows one
//! notice for it, and returns it to the caller. Nothing panics.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::{ApiError, HttpStorefront, StorefrontApi};
use crate::collection::{AddOptions, CollectionEntry, EventBus, PersistedCollectionStore};
use crate::config::StorefrontConfig;
use crate::error::ErrorCode;
use crate::notice::{NoticeLevel, Notifier};
use crate::storage::{FileStorage, MemoryStorage, StorageBackend, collection_key};
use crate::views::CountBadge;
use crate::widgets::quick_order::total_quantity;
use crate::widgets::{
    Action, CartDrawer, Outcome, QuickOrderLine, QuickOrderWidget, RecentlyViewedWidget, SearchWidget, WidgetContext,
    WidgetError, WishlistWidget,
};

pub const WISHLIST: &str = "wishlist";
pub const RECENTLY_VIEWED: &str = "recently_viewed";
pub const QUICK_ORDER: &str = "quick_order";

/// Header badges kept live from the event bus.
#[derive(Debug)]
pub struct Badges {
    pub wishlist: CountBadge,
    pub quick_order: CountBadge,
    pub cart: CountBadge,
}

#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    bus: EventBus,
    notifier: Notifier,
    ctx: WidgetContext,
    wishlist: WishlistWidget,
    recently_viewed: RecentlyViewedWidget,
    quick_order: QuickOrderWidget,
    cart: CartDrawer,
    search: SearchWidget,
    badges: Badges,
}

impl Storefront {
    /// Wire every widget over `storage` and `api`. Nothing is read or
    /// fetched until first use.
    #[must_use]
    pub fn boot(config: StorefrontConfig, storage: Arc<dyn StorageBackend>, api: Arc<dyn StorefrontApi>) -> Self {
        let bus = EventBus::new();
        let notifier = Notifier::new(bus.clone(), config.notice_ttl);
        let ctx = WidgetContext::new(api, notifier.clone(), bus.clone());

        let store = |name: &str, defaults: AddOptions| {
            PersistedCollectionStore::<CollectionEntry>::new(
                name,
                collection_key(&config.namespace, name),
                Arc::clone(&storage),
                bus.clone(),
                defaults,
            )
        };
        let wishlist_store = store(WISHLIST, AddOptions::set_like().with_max(config.wishlist_max));
        let recently_viewed_store = store(RECENTLY_VIEWED, AddOptions::recency(config.recently_viewed_max));
        let quick_order_store = PersistedCollectionStore::<QuickOrderLine>::new(
            QUICK_ORDER,
            collection_key(&config.namespace, QUICK_ORDER),
            Arc::clone(&storage),
            bus.clone(),
            AddOptions::set_like(),
        );

        let badges = Badges {
            wishlist: CountBadge::collection_size(&wishlist_store),
            quick_order: CountBadge::collection(&quick_order_store, |lines| total_quantity(lines) as usize),
            cart: CountBadge::cart(&bus, 0),
        };

        info!(
            namespace = %config.namespace,
            backend = storage.name(),
            base_url = %config.base_url,
            "storefront booted"
        );

        Self {
            wishlist: WishlistWidget::new(wishlist_store, ctx.clone()),
            recently_viewed: RecentlyViewedWidget::new(recently_viewed_store, ctx.clone()),
            quick_order: QuickOrderWidget::new(quick_order_store, ctx.clone()),
            cart: CartDrawer::new(ctx.clone()),
            search: SearchWidget::new(ctx.clone(), config.search.clone()),
            config,
            bus,
            notifier,
            ctx,
            badges,
        }
    }

    /// Boot with the HTTP client and the storage the config names: a JSON
    /// file when `storage_path` is set, memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api: Arc<dyn StorefrontApi> = Arc::new(HttpStorefront::from_config(&config)?);
        let storage: Arc<dyn StorageBackend> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path.clone())),
            None => {
                warn!("no storage path configured; collections last for this session only");
                Arc::new(MemoryStorage::new())
            }
        };
        Ok(Self::boot(config, storage, api))
    }

    /// Route `action` to its widget and apply cross-widget effects.
    ///
    /// # Errors
    ///
    /// Returns the handler's error after logging it and showing a notice.
    pub async fn dispatch(&self, action: Action) -> Result<Outcome, WidgetError> {
        let kind = action_kind(&action);
        let result = match action {
            Action::Wishlist(action) => self.wishlist.handle(action).await,
            Action::RecentlyViewed(action) => self.recently_viewed.handle(action).await,
            Action::QuickOrder(action) => self.quick_order.handle(action).await,
            Action::Cart(action) => self.cart.handle(action).await,
            Action::Search(action) => self.search.handle(action).await,
            Action::BulkAdd(lines) => crate::widgets::bulk_add(&self.ctx, &lines).await,
            Action::AddToCart { variant_id, quantity } => {
                crate::widgets::add_to_cart(&self.ctx, variant_id, quantity).await
            }
        };

        match result {
            Ok(Outcome::CartChanged) => {
                self.show_cart().await;
                Ok(Outcome::CartChanged)
            }
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.report(kind, &e);
                Err(e)
            }
        }
    }

    async fn show_cart(&self) {
        if let Err(e) = self.cart.refresh().await {
            warn!(code = e.error_code(), error = %e, "cart refresh after add failed");
        }
        if let Err(e) = self.cart.open().await {
            warn!(code = e.error_code(), error = %e, "cart drawer open failed");
        }
    }

    fn report(&self, kind: &'static str, e: &WidgetError) {
        match e.notice_level() {
            NoticeLevel::Warning => {
                warn!(action = kind, code = e.error_code(), error = %e, "action rejected");
            }
            _ => {
                error!(action = kind, code = e.error_code(), retryable = e.retryable(), error = %e, "action failed");
            }
        }
        self.notifier.push(e.notice_level(), e.user_message());
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    #[must_use]
    pub fn wishlist(&self) -> &WishlistWidget {
        &self.wishlist
    }

    #[must_use]
    pub fn recently_viewed(&self) -> &RecentlyViewedWidget {
        &self.recently_viewed
    }

    #[must_use]
    pub fn quick_order(&self) -> &QuickOrderWidget {
        &self.quick_order
    }

    #[must_use]
    pub fn cart(&self) -> &CartDrawer {
        &self.cart
    }

    #[must_use]
    pub fn search(&self) -> &SearchWidget {
        &self.search
    }

    #[must_use]
    pub fn badges(&self) -> &Badges {
        &self.badges
    }
}

fn action_kind(action: &Action) -> &'static str {
    match action {
        Action::Wishlist(_) => "wishlist",
        Action::RecentlyViewed(_) => "recently_viewed",
        Action::QuickOrder(_) => "quick_order",
        Action::Cart(_) => "cart",
        Action::Search(_) => "search",
        Action::BulkAdd(_) => "bulk_add",
        Action::AddToCart { .. } => "add_to_cart",
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
