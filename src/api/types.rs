//! Storefront wire types and errors.
//!
//! Shapes follow the storefront's AJAX JSON endpoints. Only fields the
//! widgets read are modeled; unknown fields are ignored and most known
//! ones default when absent.

use serde::{Deserialize, Deserializer, Serialize};

use crate::collection::CollectionEntry;
use crate::error::ErrorCode;
use crate::money::format_money;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by storefront API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The storefront answered with a non-success status.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The product has no variants to add.
    #[error("product {handle} has no variants")]
    NoVariant { handle: String },
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_STATUS",
            Self::Parse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::NoVariant { .. } => "E_NO_VARIANT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

impl ApiError {
    /// Text suitable for an error notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::NoVariant { .. } => "This product is unavailable".to_owned(),
            Self::Request(_) | Self::Parse(_) | Self::HttpClientBuild(_) => "Network error occurred".to_owned(),
        }
    }
}

// =============================================================================
// CART
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub item_count: u32,
    /// Minor units.
    #[serde(default)]
    pub total_price: u64,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl Cart {
    #[must_use]
    pub fn line(&self, key: &str) -> Option<&LineItem> {
        self.items.iter().find(|l| l.key == key)
    }

    /// Set a line's quantity locally and recompute totals. Zero removes the
    /// line. Returns `false` when no line has `key`.
    pub fn set_line_quantity(&mut self, key: &str, quantity: u32) -> bool {
        let Some(index) = self.items.iter().position(|l| l.key == key) else {
            return false;
        };
        if quantity == 0 {
            self.items.remove(index);
        } else {
            let line = &mut self.items[index];
            line.quantity = quantity;
            line.line_price = line.price.saturating_mul(u64::from(quantity));
            line.final_line_price = line.line_price;
        }
        self.recompute_totals();
        true
    }

    fn recompute_totals(&mut self) {
        self.item_count = self.items.iter().fold(0u32, |sum, l| sum.saturating_add(l.quantity));
        self.total_price = self
            .items
            .iter()
            .fold(0u64, |sum, l| sum.saturating_add(l.final_line_price));
    }
}

/// One cart line. `id` is the variant id; `key` identifies the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub key: String,
    pub id: u64,
    #[serde(default)]
    pub product_id: u64,
    #[serde(default)]
    pub title: String,
    pub quantity: u32,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub line_price: u64,
    #[serde(default)]
    pub final_line_price: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A line sent to the add endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    /// Variant id.
    pub id: u64,
    pub quantity: u32,
}

impl AddLine {
    #[must_use]
    pub const fn new(id: u64, quantity: u32) -> Self {
        Self { id, quantity }
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub price: u64,
}

impl Product {
    /// First variant marked available, else the first variant.
    #[must_use]
    pub fn first_available_variant(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.available)
            .or_else(|| self.variants.first())
    }

    /// `images[0]`, else `featured_image`, with protocol-relative URLs fixed.
    #[must_use]
    pub fn primary_image(&self) -> Option<String> {
        self.images
            .first()
            .or(self.featured_image.as_ref())
            .filter(|src| !src.trim().is_empty())
            .map(|src| normalize_cdn_url(src))
    }

    /// Collection entry snapshot of this product.
    #[must_use]
    pub fn to_entry(&self) -> CollectionEntry {
        let mut entry = CollectionEntry::new(self.id)
            .with_title(self.title.clone())
            .with_url(format!("/products/{}", self.handle))
            .with_price(format_money(self.price, "$"));
        if let Some(image) = self.primary_image() {
            entry = entry.with_image(image);
        }
        entry
    }
}

/// A product returned by the predictive search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedProduct {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, deserialize_with = "image_src")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: Option<String>,
}

// =============================================================================
// HELPERS
// =============================================================================

/// `//cdn.example/x.jpg` becomes `https://cdn.example/x.jpg`.
#[must_use]
pub fn normalize_cdn_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else {
        src.to_owned()
    }
}

/// Product handle from a `/products/{handle}` URL, absolute or relative.
#[must_use]
pub fn handle_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/products/")?;
    let handle = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(".js");
    (!handle.is_empty()).then(|| handle.to_owned())
}

/// Image given either as a URL string or as `{"url": ..}` / `{"src": ..}`.
fn image_src<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let src = match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Object(map)) => map
            .get("url")
            .or_else(|| map.get("src"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    };
    Ok(src
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_cdn_url(&s)))
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
