//! Cart totals.
//!
//! Totals are a pure function of the line items, the coupon and the pricing
//! rules. They are recomputed from scratch on every read.

use macrocart_core::{CartLineItem, CartTotals, Coupon, round_money};
use rust_decimal::Decimal;

use crate::cart::coupon::discount_for;
use crate::config::PricingConfig;
use crate::error::{Result, StorefrontError};

/// Compute subtotal, discount, shipping and total.
///
/// Shipping is free once the discounted subtotal reaches the threshold.
///
/// # Errors
///
/// Returns [`StorefrontError::AmountOverflow`] if any amount leaves the
/// decimal range.
pub fn compute_totals(
    lines: &[CartLineItem],
    coupon: Option<&Coupon>,
    pricing: &PricingConfig,
) -> Result<CartTotals> {
    let subtotal = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| {
            line.line_total().and_then(|t| acc.checked_add(t))
        })
        .map(round_money)
        .ok_or(StorefrontError::AmountOverflow)?;
    let discount = discount_for(coupon, subtotal)?;
    let discounted = subtotal - discount;

    let shipping = if discounted >= pricing.free_shipping_threshold {
        Decimal::ZERO
    } else {
        pricing.shipping_fee
    };

    let total = discounted
        .checked_add(shipping)
        .ok_or(StorefrontError::AmountOverflow)?
        .max(Decimal::ZERO);

    Ok(CartTotals {
        subtotal,
        discount,
        shipping,
        total,
    })
}
