//! Shop REST API client.
//!
//! Uses `reqwest` for HTTP with JSON bodies. The backend wraps responses in
//! a `{ "data": ..., "message": ... }` envelope; the client unwraps it and
//! maps HTTP statuses onto [`ClientError`]. Catalog reads are cached using
//! `moka` (5-minute TTL); the cart is never cached - it is mutable state the
//! server owns.

mod cache;
pub mod types;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod wishlist;

pub use auth::AuthApi;
pub use cart::CartApi;
pub use wishlist::WishlistApi;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ShopConfig;
use crate::error::ClientError;

use cache::CacheValue;

/// Seconds a catalog entry stays cached.
const CACHE_TTL_SECS: u64 = 300;
/// Maximum number of cached catalog entries.
const CACHE_CAPACITY: u64 = 1000;
/// Response bodies are truncated to this length in error messages and logs.
const BODY_SNIPPET_LEN: usize = 500;

// =============================================================================
// ShopClient
// =============================================================================

/// Client for the shop REST API.
///
/// Provides typed access to cart, wishlist, auth, catalog, order, and admin
/// endpoints. Cheaply cloneable; clones share the HTTP connection pool and
/// the catalog cache.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ShopClient {
    /// Create a new shop API client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ShopConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .build();

        Ok(Self {
            inner: Arc::new(ShopClientInner {
                http,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Build a URL for the given path segments under the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.cache
    }

    /// Attach the bearer credential to a request.
    fn authed(
        req: reqwest::RequestBuilder,
        credential: &SecretString,
    ) -> reqwest::RequestBuilder {
        req.header(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", credential.expose_secret()),
        )
    }

    /// Execute a request and deserialize the enveloped response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.dispatch(req).await?;

        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %snippet(&body),
                    "Failed to parse shop API response"
                );
                return Err(ClientError::Parse(e));
            }
        };

        // The backend wraps payloads as { "data": ... }; older endpoints
        // return the payload bare. Accept both.
        let payload = match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => {
                match map.remove("data") {
                    Some(serde_json::Value::Null) | None => serde_json::Value::Object(map),
                    Some(data) => data,
                }
            }
            other => other,
        };

        serde_json::from_value(payload).map_err(ClientError::Parse)
    }

    /// Execute a request, discarding any response body.
    async fn execute_unit(&self, req: reqwest::RequestBuilder) -> Result<(), ClientError> {
        self.dispatch(req).await.map(drop)
    }

    /// Send a request, map non-success statuses to errors, return the body.
    async fn dispatch(&self, req: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let response = req.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ClientError::RateLimited(retry_after));
        }

        // Read the body first for better error diagnostics
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        tracing::debug!(
            status = %status,
            body = %snippet(&body),
            "Shop API returned non-success status"
        );

        let message = extract_message(&body).unwrap_or_else(|| snippet(&body));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(message)),
            reqwest::StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ClientError::Validation(message))
            }
            other => Err(ClientError::Server {
                status: other.as_u16(),
                message,
            }),
        }
    }
}

/// Pull the human-readable `message` field out of an error envelope.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}
