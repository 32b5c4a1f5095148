//! Backend REST client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Caches products using `moka` with the TTL
//! from [`BackendConfig`].

use std::future::Future;
use std::sync::Arc;

use macrocart_core::{CartSnapshot, Coupon, Product, ProductEnvelope, VariantId};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{BackendError, ProductSource};
use crate::config::BackendConfig;

/// How much of an error body ends up in logs and errors.
const BODY_PREVIEW_CHARS: usize = 200;

const DEFAULT_REJECTION: &str = "Coupon is not valid";

/// Client for the storefront backend.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    cache: Cache<String, Arc<Product>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody {
    variant_id: VariantId,
    quantity: u32,
}

#[derive(Serialize)]
struct CouponBody<'a> {
    code: &'a str,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                cache,
            }),
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the product does not exist, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product(&self, slug: &str) -> Result<Arc<Product>, BackendError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(BackendError::NotFound("Product slug is empty".to_string()));
        }

        if let Some(product) = self.inner.cache.get(slug).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint(&["public", "products", slug])?;
        let (status, body) = self.send(self.inner.client.get(url)).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(format!("Product not found: {slug}")));
        }

        let envelope: ProductEnvelope = parse_body(status, &body)?;
        let product = Arc::new(envelope.product);

        self.inner
            .cache
            .insert(slug.to_string(), Arc::clone(&product))
            .await;

        Ok(product)
    }

    /// Drop a cached product so the next fetch goes to the backend.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn invalidate_product(&self, slug: &str) {
        self.inner.cache.invalidate(slug.trim()).await;
        debug!("Invalidated cached product");
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Add a variant to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn add_to_cart(
        &self,
        variant_id: VariantId,
        quantity: u32,
    ) -> Result<CartSnapshot, BackendError> {
        let url = self.endpoint(&["cart"])?;
        let request = self.inner.client.post(url).json(&AddToCartBody {
            variant_id,
            quantity,
        });
        let (status, body) = self.send(request).await?;
        parse_body(status, &body)
    }

    /// Apply a coupon code to the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::CouponRejected`] if the backend refuses the
    /// code, or another error if the request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn apply_coupon(&self, code: &str) -> Result<Coupon, BackendError> {
        let url = self.endpoint(&["cart", "coupon"])?;
        let request = self.inner.client.post(url).json(&CouponBody { code });
        let (status, body) = self.send(request).await?;

        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            return Err(BackendError::CouponRejected(rejection_message(&body)));
        }

        parse_body(status, &body)
    }

    /// Remove the coupon from the server-side cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn remove_coupon(&self) -> Result<(), BackendError> {
        let url = self.endpoint(&["cart", "coupon"])?;
        let (status, body) = self.send(self.inner.client.delete(url)).await?;

        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, &body))
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and read the body as text.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), BackendError> {
        let request = match &self.inner.api_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl ProductSource for BackendClient {
    fn fetch_product(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Arc<Product>, BackendError>> + Send {
        self.get_product(slug)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn status_error(status: StatusCode, body: &str) -> BackendError {
    tracing::error!(
        status = %status,
        body = %preview(body),
        "Backend returned non-success status"
    );
    BackendError::Status {
        status: status.as_u16(),
        body: preview(body),
    }
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, BackendError> {
    if !status.is_success() {
        return Err(status_error(status, body));
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %preview(body),
            "Failed to parse backend response"
        );
        BackendError::Parse(e)
    })
}

/// Extract the shopper-facing reason from a coupon rejection body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| DEFAULT_REJECTION.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("https://api.example.com/v1");
        let url = client.endpoint(&["public", "products", "whey-isolate"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/public/products/whey-isolate"
        );
    }

    #[test]
    fn test_endpoint_encodes_slug() {
        let client = client("https://api.example.com/");
        let url = client.endpoint(&["public", "products", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/public/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message(r#"{"message":"Coupon has expired"}"#),
            "Coupon has expired"
        );
        assert_eq!(rejection_message(r#"{"message":"  "}"#), DEFAULT_REJECTION);
        assert_eq!(rejection_message("<html>"), DEFAULT_REJECTION);
    }

    #[test]
    fn test_parse_body_non_success_is_status_error() {
        let err = parse_body::<Coupon>(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 502, .. }));
    }
}
