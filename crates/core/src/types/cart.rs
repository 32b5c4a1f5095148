//! Cart, coupon and totals types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartLineId, VariantId};

/// A line in the shopper's cart.
///
/// The line references a variant by ID only; the catalog is owned by the
/// backend. `unit_price` is captured when the line is created and is not
/// updated when the live catalog price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: CartLineId,
    pub variant_id: VariantId,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// Stock seen when the line was added. `None` when unknown.
    #[serde(default)]
    pub max_quantity: Option<u32>,
}

impl CartLineItem {
    /// `unit_price * quantity`, or `None` if the product overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// How a coupon's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal (0-100).
    Percentage,
    /// `value` is an amount off the subtotal.
    Fixed,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percentage => write!(f, "percentage"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "fixed" => Ok(Self::Fixed),
            _ => Err(format!("invalid discount type: {s}")),
        }
    }
}

/// A discount code applied to the cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
}

/// Derived cart totals. Never stored; recomputed from lines and coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Cart state as returned by the backend after a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    #[serde(default)]
    pub coupon: Option<Coupon>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let line = CartLineItem {
            id: CartLineId::new(1),
            variant_id: VariantId::new(9),
            quantity: 3,
            unit_price: Decimal::new(19_99, 2),
            max_quantity: None,
        };
        assert_eq!(line.line_total(), Some(Decimal::new(59_97, 2)));
    }

    #[test]
    fn test_line_total_overflow_is_none() {
        let line = CartLineItem {
            id: CartLineId::new(1),
            variant_id: VariantId::new(9),
            quantity: 2,
            unit_price: Decimal::MAX,
            max_quantity: None,
        };
        assert_eq!(line.line_total(), None);
    }

    #[test]
    fn test_coupon_wire_format() {
        let json = r#"{"code": "SAVE10", "discountType": "percentage", "value": 10}"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(coupon.discount_type, DiscountType::Percentage);
        assert_eq!(coupon.value, Decimal::from(10));
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot: CartSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.items.is_empty());
        assert!(snapshot.coupon.is_none());
    }
}
