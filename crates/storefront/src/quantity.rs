//! Quantity clamping against variant stock.

use macrocart_core::Variant;
use serde::Serialize;

/// Informational stock notice. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockWarning {
    /// Requested more than is in stock; quantity was reduced to `available`.
    LimitedStock { available: u32 },
}

impl std::fmt::Display for StockWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LimitedStock { available } => write!(f, "Only {available} left in stock"),
        }
    }
}

/// Result of clamping a requested quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClampedQuantity {
    pub quantity: u32,
    pub warning: Option<StockWarning>,
}

/// Clamp `requested` to `[1, variant.quantity]`.
///
/// Without a variant there is no known stock limit and only the lower bound
/// applies. Requests below 1 become 1 without a warning.
#[must_use]
pub fn clamp_quantity(requested: i64, variant: Option<&Variant>) -> ClampedQuantity {
    clamp_to_stock(requested, variant.map(|v| v.quantity))
}

/// Clamp `requested` to `[1, available]`, or `[1, ∞)` when stock is unknown.
#[must_use]
pub fn clamp_to_stock(requested: i64, available: Option<u32>) -> ClampedQuantity {
    let requested = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);

    match available {
        Some(available) if requested > available => ClampedQuantity {
            quantity: available,
            warning: Some(StockWarning::LimitedStock { available }),
        },
        _ => ClampedQuantity {
            quantity: requested,
            warning: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use macrocart_core::VariantId;
    use rust_decimal::Decimal;

    use super::*;

    fn variant_with_stock(quantity: u32) -> Variant {
        Variant {
            id: VariantId::new(1),
            flavor_id: None,
            weight_id: None,
            price: Decimal::from(100),
            sale_price: None,
            quantity,
            is_active: true,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_below_one_clamps_to_one() {
        let v = variant_with_stock(10);
        for requested in [0, -1, -100, i64::MIN] {
            let clamped = clamp_quantity(requested, Some(&v));
            assert_eq!(clamped.quantity, 1);
            assert!(clamped.warning.is_none());
        }
    }

    #[test]
    fn test_within_stock_unchanged() {
        let v = variant_with_stock(10);
        let clamped = clamp_quantity(7, Some(&v));
        assert_eq!(clamped.quantity, 7);
        assert!(clamped.warning.is_none());

        let clamped = clamp_quantity(10, Some(&v));
        assert_eq!(clamped.quantity, 10);
        assert!(clamped.warning.is_none());
    }

    #[test]
    fn test_above_stock_clamps_with_warning() {
        let v = variant_with_stock(4);
        let clamped = clamp_quantity(i64::from(v.quantity) + 5, Some(&v));
        assert_eq!(clamped.quantity, 4);
        assert_eq!(
            clamped.warning,
            Some(StockWarning::LimitedStock { available: 4 })
        );
    }

    #[test]
    fn test_no_variant_only_applies_lower_bound() {
        assert_eq!(clamp_quantity(250, None).quantity, 250);
        assert!(clamp_quantity(250, None).warning.is_none());
        assert_eq!(clamp_quantity(0, None).quantity, 1);
    }

    #[test]
    fn test_huge_request_saturates() {
        let clamped = clamp_to_stock(i64::MAX, None);
        assert_eq!(clamped.quantity, u32::MAX);
    }

    #[test]
    fn test_warning_display() {
        let warning = StockWarning::LimitedStock { available: 3 };
        assert_eq!(warning.to_string(), "Only 3 left in stock");
    }
}
