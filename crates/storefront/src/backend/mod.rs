//! REST backend access.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products and the server-side cart
//! - [`BackendClient`] talks to it over HTTP with `reqwest`
//! - Product responses are cached in memory via `moka` (TTL from config)
//!
//! # Example
//!
//! ```rust,ignore
//! use macrocart_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.api)?;
//! let product = client.get_product("whey-isolate").await?;
//! let snapshot = client.add_to_cart(product.variants[0].id, 1).await?;
//! ```

mod client;

use std::future::Future;
use std::sync::Arc;

use macrocart_core::Product;
use thiserror::Error;

pub use client::BackendClient;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success status not covered by a more specific variant.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend refused a coupon code.
    #[error("Coupon rejected: {0}")]
    CouponRejected(String),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

/// Anything that can fetch a product by slug.
///
/// Implemented by [`BackendClient`]; tests substitute in-memory sources.
pub trait ProductSource: Send + Sync {
    fn fetch_product(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Arc<Product>, BackendError>> + Send;
}
