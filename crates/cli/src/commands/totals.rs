//! Cart totals from a cart file.
//!
//! # Usage
//!
//! ```bash
//! mc-cli totals -c cart.yaml
//! ```
//!
//! The file is a cart snapshot:
//!
//! ```yaml
//! items:
//!   - id: 1
//!     variantId: 10
//!     quantity: 2
//!     unitPrice: "500"
//! coupon:
//!   code: SAVE10
//!   discountType: percentage
//!   value: "10"
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD`, `STOREFRONT_SHIPPING_FEE`,
//!   `STOREFRONT_MIN_CHECKOUT_TOTAL`, `STOREFRONT_CURRENCY`

use std::path::Path;

use macrocart_core::{CartSnapshot, CartTotals, Price};
use macrocart_storefront::cart::CartStore;
use macrocart_storefront::config::PricingConfig;
use serde::Serialize;
use tracing::{info, warn};

use super::{CommandError, Output, read_file};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalsReport {
    item_count: u32,
    totals: CartTotals,
    currency: String,
    coupon_code: Option<String>,
    /// `None` when the cart can be checked out.
    checkout_blocked: Option<String>,
}

fn parse_cart(path: &Path, content: &str) -> Result<CartSnapshot, CommandError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Compute totals for a cart file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, pricing config is
/// invalid, the cart's coupon fails validation, or an amount is out of range.
pub fn run(path: &Path, output: Output) -> Result<(), CommandError> {
    let pricing = PricingConfig::from_env()?;
    let snapshot = parse_cart(path, &read_file(path)?)?;

    let mut cart = CartStore::new(pricing);
    cart.sync_snapshot(CartSnapshot {
        items: snapshot.items,
        coupon: None,
    });
    if let Some(coupon) = &snapshot.coupon {
        cart.apply_coupon(coupon)?;
    }

    let totals = cart.totals()?;
    let checkout_blocked = cart.checkout().err().map(|e| e.user_message());

    let report = TotalsReport {
        item_count: cart.item_count(),
        totals,
        currency: pricing.currency.code().to_string(),
        coupon_code: cart.coupon().map(|c| c.code.clone()),
        checkout_blocked,
    };

    if output.emit(&report)? {
        return Ok(());
    }

    let money = |amount| Price::new(amount, pricing.currency);
    info!(
        items = report.item_count,
        subtotal = %money(totals.subtotal),
        discount = %money(totals.discount),
        shipping = %money(totals.shipping),
        total = %money(totals.total),
        "Cart totals"
    );
    match &report.checkout_blocked {
        None => info!("Ready for checkout"),
        Some(reason) => warn!(reason = %reason, "Checkout blocked"),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use macrocart_core::DiscountType;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_parse_yaml_cart() {
        let yaml = r#"
items:
  - id: 1
    variantId: 10
    quantity: 2
    unitPrice: "500"
coupon:
  code: save10
  discountType: percentage
  value: "10"
"#;
        let cart = parse_cart(Path::new("cart.yaml"), yaml).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().unit_price, Decimal::from(500));
        assert_eq!(cart.coupon.unwrap().discount_type, DiscountType::Percentage);
    }

    #[test]
    fn test_parse_json_cart() {
        let json = r#"{"items":[{"id":1,"variantId":10,"quantity":1,"unitPrice":"99.50"}]}"#;
        let cart = parse_cart(Path::new("CART.JSON"), json).unwrap();
        assert_eq!(cart.items.first().unwrap().unit_price, Decimal::new(9950, 2));
        assert!(cart.coupon.is_none());
    }
}
