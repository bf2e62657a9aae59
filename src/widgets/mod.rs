//! Widget controllers.
//!
//! DESIGN
//! ======
//! Each storefront widget is a controller with an explicit action enum.
//! Controllers own their store or snapshot, talk to the storefront through
//! [`StorefrontApi`], and push success/info notices themselves.
//!
//! ERROR HANDLING
//! ==============
//! Handlers return [`WidgetError`]; they never push error notices. The
//! dispatcher in `app` logs every failure and turns it into exactly one
//! notice, so a failing widget cannot affect any other.

pub mod cart_drawer;
pub mod quick_order;
pub mod recently_viewed;
pub mod search;
pub mod wishlist;

use std::sync::Arc;

use tracing::info;

use crate::api::{AddLine, ApiError, LineItem, StorefrontApi};
use crate::collection::EventBus;
use crate::error::ErrorCode;
use crate::notice::{NoticeLevel, Notifier};
use crate::validation::ValidationError;

pub use cart_drawer::{CartAction, CartDrawer};
pub use quick_order::{QuickOrderAction, QuickOrderLine, QuickOrderWidget};
pub use recently_viewed::{RecentlyViewedAction, RecentlyViewedWidget};
pub use search::{SearchAction, SearchOutcome, SearchWidget};
pub use wishlist::{WishlistAction, WishlistWidget};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An API failure reported to the user with a fixed message.
    #[error("{message}: {source}")]
    Action {
        message: &'static str,
        #[source]
        source: ApiError,
    },
}

impl ErrorCode for WidgetError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api(e) | Self::Action { source: e, .. } => e.error_code(),
            Self::Validation(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Api(e) | Self::Action { source: e, .. } => e.retryable(),
            Self::Validation(_) => false,
        }
    }
}

impl WidgetError {
    /// Text for the notice shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Validation(e) => e.to_string(),
            Self::Action { message, .. } => (*message).to_owned(),
        }
    }

    /// Validation problems are warnings; everything else is an error.
    #[must_use]
    pub fn notice_level(&self) -> NoticeLevel {
        match self {
            Self::Validation(_) => NoticeLevel::Warning,
            Self::Api(_) | Self::Action { .. } => NoticeLevel::Error,
        }
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Every user intent the storefront handles.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Wishlist(WishlistAction),
    RecentlyViewed(RecentlyViewedAction),
    QuickOrder(QuickOrderAction),
    Cart(CartAction),
    Search(SearchAction),
    /// Quick-add bulk form: add every selected line in one request.
    BulkAdd(Vec<AddLine>),
    /// Product form submit.
    AddToCart { variant_id: u64, quantity: u32 },
}

/// What a handled action asks of the rest of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The remote cart changed; the drawer should refresh and open.
    CartChanged,
    Search(SearchOutcome),
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Collaborators shared by every widget.
#[derive(Clone)]
pub struct WidgetContext {
    pub api: Arc<dyn StorefrontApi>,
    pub notifier: Notifier,
    pub bus: EventBus,
}

impl std::fmt::Debug for WidgetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetContext")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl WidgetContext {
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>, notifier: Notifier, bus: EventBus) -> Self {
        Self { api, notifier, bus }
    }

    /// Add one unit of a product's first available variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be fetched, has no variants,
    /// or the add is rejected.
    pub async fn add_first_variant(&self, handle: &str) -> Result<Vec<LineItem>, ApiError> {
        let product = self.api.product(handle).await?;
        let variant = product
            .first_available_variant()
            .ok_or_else(|| ApiError::NoVariant { handle: handle.to_owned() })?;
        let added = self.api.add_items(&[AddLine::new(variant.id, 1)]).await?;
        info!(handle, variant_id = variant.id, "added first variant to cart");
        Ok(added)
    }
}

// =============================================================================
// CART FORMS
// =============================================================================

/// Quick-add bulk submit.
///
/// # Errors
///
/// Returns a validation error for an empty selection and an action error
/// when the storefront rejects the add.
pub async fn bulk_add(ctx: &WidgetContext, lines: &[AddLine]) -> Result<Outcome, WidgetError> {
    let lines: Vec<AddLine> = lines.iter().copied().filter(|l| l.quantity > 0).collect();
    if lines.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    ctx.api
        .add_items(&lines)
        .await
        .map_err(|source| WidgetError::Action { message: "Error adding items to cart", source })?;
    ctx.notifier
        .success(format!("{} items added to cart!", lines.len()));
    Ok(Outcome::CartChanged)
}

/// Product form submit.
///
/// # Errors
///
/// Returns a validation error for a quantity outside the allowed bounds
/// (nothing is sent), or the storefront's error when the add is rejected.
pub async fn add_to_cart(ctx: &WidgetContext, variant_id: u64, quantity: u32) -> Result<Outcome, WidgetError> {
    let quantity = crate::validation::QuantityBounds::default().check(i64::from(quantity))?;
    ctx.api
        .add_items(&[AddLine::new(variant_id, quantity)])
        .await?;
    ctx.notifier
        .success("Product added to cart successfully!");
    Ok(Outcome::CartChanged)
}

#[cfg(test)]
#[path = "test_support.rs"]
pub(crate) mod test_support;
