//! Product loading with stale-response protection.
//!
//! Every fetch is tagged with a [`RequestToken`]. Only the response to the
//! most recently issued token is applied; anything older (success or error)
//! is discarded. Switching products quickly therefore never shows the
//! previous product's data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use macrocart_core::Product;
use tracing::{instrument, warn};

use crate::backend::{BackendError, ProductSource};
use crate::catalog::ProductSelection;

/// Monotonically increasing fetch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Result of a load once the response has arrived.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The response belongs to the latest request.
    Current {
        token: RequestToken,
        product: Arc<Product>,
    },
    /// A newer request was issued while this one was in flight.
    Stale {
        token: RequestToken,
        latest: RequestToken,
    },
}

impl LoadOutcome {
    /// The product, if this outcome should be applied.
    #[must_use]
    pub fn into_current(self) -> Option<Arc<Product>> {
        match self {
            Self::Current { product, .. } => Some(product),
            Self::Stale { .. } => None,
        }
    }
}

/// Loads products from a [`ProductSource`], discarding stale responses.
#[derive(Debug)]
pub struct ProductLoader<S> {
    source: S,
    latest: AtomicU64,
}

impl<S: ProductSource> ProductLoader<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
            latest: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Issue a new token, superseding every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued token.
    #[must_use]
    pub fn latest(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest() == token
    }

    /// Fetch a product.
    ///
    /// # Errors
    ///
    /// Returns the source's error only if this is still the latest request.
    /// Errors from superseded requests are logged and reported as
    /// [`LoadOutcome::Stale`].
    #[instrument(skip(self), fields(token))]
    pub async fn load(&self, slug: &str) -> Result<LoadOutcome, BackendError> {
        let token = self.issue();
        tracing::Span::current().record("token", token.get());

        let result = self.source.fetch_product(slug).await;

        let latest = self.latest();
        if latest != token {
            match &result {
                Ok(_) => warn!(latest = latest.get(), "Discarding stale product response"),
                Err(e) => warn!(latest = latest.get(), error = %e, "Discarding stale product error"),
            }
            return Ok(LoadOutcome::Stale { token, latest });
        }

        Ok(LoadOutcome::Current {
            token,
            product: result?,
        })
    }

    /// Fetch a product and build an auto-selected [`ProductSelection`].
    ///
    /// Returns `None` if the response was stale.
    ///
    /// # Errors
    ///
    /// Returns the source's error if this is still the latest request.
    pub async fn load_selection(&self, slug: &str) -> Result<Option<ProductSelection>, BackendError> {
        Ok(self
            .load(slug)
            .await?
            .into_current()
            .map(ProductSelection::for_product))
    }
}
