//! Storefront error taxonomy.
//!
//! Every variant is recoverable: the UI degrades to a disabled control or a
//! visible notice. Low stock is deliberately absent here; it is reported as a
//! [`StockWarning`](crate::quantity::StockWarning) alongside a successful
//! result.

use macrocart_core::{CartLineId, FlavorId, VariantId, WeightId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::backend::BackendError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The chosen flavor/weight combination has no active variant.
    #[error("No variant available for flavor {flavor:?} and weight {weight:?}")]
    NoMatchingVariant {
        flavor: Option<FlavorId>,
        weight: Option<WeightId>,
    },

    /// The resolved variant has no stock.
    #[error("Variant {0} is out of stock")]
    OutOfStock(VariantId),

    /// Coupon failed validation or was rejected by the backend.
    #[error("Invalid coupon: {0}")]
    CouponInvalid(String),

    /// Cart total is below the smallest payable amount.
    #[error("Cart total {total} is below the minimum checkout amount {minimum}")]
    CheckoutBelowMinimum { total: Decimal, minimum: Decimal },

    /// Checkout attempted with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart amount does not fit the decimal range.
    #[error("Cart amount is out of range")]
    AmountOverflow,

    /// Referenced cart line does not exist.
    #[error("Cart line not found: {0}")]
    LineNotFound(CartLineId),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Backend(#[source] BackendError),
}

impl From<BackendError> for StorefrontError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::CouponRejected(reason) => Self::CouponInvalid(reason),
            other => Self::Backend(other),
        }
    }
}

impl StorefrontError {
    /// Message safe to show to the shopper.
    ///
    /// Backend failures are reduced to a generic notice; transport details
    /// only go to the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NoMatchingVariant { .. } => {
                "This combination is currently unavailable".to_string()
            }
            Self::OutOfStock(_) => "Out of stock".to_string(),
            Self::CouponInvalid(reason) => format!("Coupon could not be applied: {reason}"),
            Self::CheckoutBelowMinimum { minimum, .. } => {
                format!("Order total must be at least {minimum} to check out")
            }
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::AmountOverflow => "Your cart total is too large to process".to_string(),
            Self::LineNotFound(_) => "That item is no longer in your cart".to_string(),
            Self::Backend(BackendError::NotFound(_)) => "Not found".to_string(),
            Self::Backend(BackendError::RateLimited(_)) => {
                "Too many requests, please try again shortly".to_string()
            }
            Self::Backend(_) => "Something went wrong, please try again".to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::OutOfStock(VariantId::new(7));
        assert_eq!(err.to_string(), "Variant 7 is out of stock");

        let err = StorefrontError::CouponInvalid("expired".to_string());
        assert_eq!(err.to_string(), "Invalid coupon: expired");
    }

    #[test]
    fn test_user_message_hides_backend_details() {
        let err = StorefrontError::Backend(BackendError::Status {
            status: 502,
            body: "upstream pool exhausted at db-3".to_string(),
        });
        let message = err.user_message();
        assert!(!message.contains("db-3"));
        assert_eq!(message, "Something went wrong, please try again");
    }

    #[test]
    fn test_user_message_for_minimum() {
        let err = StorefrontError::CheckoutBelowMinimum {
            total: Decimal::ZERO,
            minimum: Decimal::ONE,
        };
        assert_eq!(
            err.user_message(),
            "Order total must be at least 1 to check out"
        );
    }

    #[test]
    fn test_coupon_rejection_maps_to_coupon_invalid() {
        let err: StorefrontError =
            BackendError::CouponRejected("Coupon has expired".to_string()).into();
        assert!(matches!(err, StorefrontError::CouponInvalid(msg) if msg == "Coupon has expired"));
    }
}
