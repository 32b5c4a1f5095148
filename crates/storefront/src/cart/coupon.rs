//! Coupon validation and discount arithmetic.

use macrocart_core::{Coupon, DiscountType, round_money};
use rust_decimal::Decimal;

use crate::error::{Result, StorefrontError};

const MAX_CODE_LENGTH: usize = 64;

/// Validate a coupon before it is held in cart state.
///
/// The code is trimmed and upper-cased.
///
/// # Errors
///
/// Returns [`StorefrontError::CouponInvalid`] when the code is empty or too
/// long, the value is not positive, or a percentage exceeds 100.
pub fn validate_coupon(coupon: &Coupon) -> Result<Coupon> {
    let code = coupon.code.trim();
    if code.is_empty() {
        return Err(StorefrontError::CouponInvalid(
            "coupon code cannot be empty".to_string(),
        ));
    }
    if code.len() > MAX_CODE_LENGTH {
        return Err(StorefrontError::CouponInvalid(format!(
            "coupon code must be at most {MAX_CODE_LENGTH} characters"
        )));
    }
    if coupon.value <= Decimal::ZERO {
        return Err(StorefrontError::CouponInvalid(
            "coupon value must be positive".to_string(),
        ));
    }
    if coupon.discount_type == DiscountType::Percentage && coupon.value > Decimal::ONE_HUNDRED {
        return Err(StorefrontError::CouponInvalid(
            "percentage discount cannot exceed 100".to_string(),
        ));
    }

    Ok(Coupon {
        code: code.to_uppercase(),
        discount_type: coupon.discount_type,
        value: coupon.value,
    })
}

/// Discount a coupon grants on `subtotal`, within `[0, subtotal]`.
///
/// # Errors
///
/// Returns [`StorefrontError::AmountOverflow`] if the percentage arithmetic
/// leaves the decimal range.
pub fn discount_for(coupon: Option<&Coupon>, subtotal: Decimal) -> Result<Decimal> {
    let Some(coupon) = coupon else {
        return Ok(Decimal::ZERO);
    };

    let raw = match coupon.discount_type {
        DiscountType::Percentage => subtotal
            .checked_mul(coupon.value)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(round_money)
            .ok_or(StorefrontError::AmountOverflow)?,
        DiscountType::Fixed => coupon.value,
    };

    Ok(raw.clamp(Decimal::ZERO, subtotal.max(Decimal::ZERO)))
}
