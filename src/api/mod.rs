//! Storefront cart, product and search endpoints.
//!
//! DESIGN
//! ======
//! Widgets talk to the storefront only through [`StorefrontApi`], so tests
//! swap in an in-memory implementation. [`HttpStorefront`] is the real
//! client. Every call either returns the updated representation or an
//! [`ApiError`]; nothing is retried.

pub mod http;
pub mod types;

pub use http::HttpStorefront;
pub use types::{
    AddLine, ApiError, Cart, LineItem, Product, SuggestedProduct, Variant, handle_from_url, normalize_cdn_url,
};

// =============================================================================
// STOREFRONT API TRAIT
// =============================================================================

/// Async storefront operations used by the widgets.
#[async_trait::async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Current cart (`GET /cart.js`).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is malformed.
    async fn cart(&self) -> Result<Cart, ApiError>;

    /// Add lines to the cart in one request (`POST /cart/add.js`).
    /// Returns the added line items.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the storefront rejects any line.
    async fn add_items(&self, lines: &[AddLine]) -> Result<Vec<LineItem>, ApiError>;

    /// Set the absolute quantity of the line with `key`
    /// (`POST /cart/change.js`). Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the line is unknown.
    async fn change_line(&self, key: &str, quantity: u32) -> Result<Cart, ApiError>;

    /// Product JSON by handle (`GET /products/{handle}.js`).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the product does not exist or the request fails.
    async fn product(&self, handle: &str) -> Result<Product, ApiError>;

    /// Predictive search (`GET /search/suggest.json`), products only.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is malformed.
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestedProduct>, ApiError>;
}
