//! `reqwest` client for the storefront AJAX endpoints.
//!
//! Thin HTTP wrapper. Status handling and body decoding live in pure
//! functions (`decode`, `parse_error`, `parse_added`, `parse_suggestions`)
//! so they are testable without a server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::StorefrontApi;
use super::types::{AddLine, ApiError, Cart, LineItem, Product, SuggestedProduct};
use crate::config::{HttpTimeouts, StorefrontConfig};

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpStorefront {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStorefront {
    /// Client rooted at `base_url` (scheme + host, optional path prefix).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send `request` and return the body of a 2xx response.
    async fn send(&self, path: &str, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(path, error = %e, "storefront request failed");
                ApiError::Request(e.to_string())
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        debug!(path, status, bytes = text.len(), "storefront response");

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl StorefrontApi for HttpStorefront {
    async fn cart(&self) -> Result<Cart, ApiError> {
        let path = "/cart.js";
        let body = self.send(path, self.http.get(self.url(path))).await?;
        decode(&body)
    }

    async fn add_items(&self, lines: &[AddLine]) -> Result<Vec<LineItem>, ApiError> {
        let path = "/cart/add.js";
        let request = self
            .http
            .post(self.url(path))
            .json(&AddRequest { items: lines });
        let body = self.send(path, request).await?;
        parse_added(&body)
    }

    async fn change_line(&self, key: &str, quantity: u32) -> Result<Cart, ApiError> {
        let path = "/cart/change.js";
        let request = self
            .http
            .post(self.url(path))
            .json(&ChangeRequest { id: key, quantity });
        let body = self.send(path, request).await?;
        decode(&body)
    }

    async fn product(&self, handle: &str) -> Result<Product, ApiError> {
        let path = format!("/products/{handle}.js");
        let body = self.send(&path, self.http.get(self.url(&path))).await?;
        decode(&body)
    }

    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<SuggestedProduct>, ApiError> {
        let path = "/search/suggest.json";
        let limit = limit.to_string();
        let request = self.http.get(self.url(path)).query(&[
            ("q", query),
            ("resources[type]", "product"),
            ("resources[limit]", limit.as_str()),
        ]);
        let body = self.send(path, request).await?;
        parse_suggestions(&body)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct AddRequest<'a> {
    items: &'a [AddLine],
}

#[derive(serde::Serialize)]
struct ChangeRequest<'a> {
    id: &'a str,
    quantity: u32,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum AddResponse {
    Items { items: Vec<LineItem> },
    Single(LineItem),
}

#[derive(serde::Deserialize)]
struct SuggestResponse {
    resources: SuggestResources,
}

#[derive(serde::Deserialize)]
struct SuggestResources {
    results: SuggestResults,
}

#[derive(serde::Deserialize)]
struct SuggestResults {
    #[serde(default)]
    products: Vec<SuggestedProduct>,
}

// =============================================================================
// PARSING
// =============================================================================

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Error for a non-2xx response. The storefront's `description` is
/// preferred over its `message`; a generic text is used when neither exists.
fn parse_error(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    let message = field("description")
        .or_else(|| field("message"))
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    ApiError::Status { status, message }
}

fn parse_added(body: &str) -> Result<Vec<LineItem>, ApiError> {
    Ok(match decode::<AddResponse>(body)? {
        AddResponse::Items { items } => items,
        AddResponse::Single(item) => vec![item],
    })
}

fn parse_suggestions(body: &str) -> Result<Vec<SuggestedProduct>, ApiError> {
    let response: SuggestResponse = decode(body)?;
    Ok(response.resources.results.products)
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
