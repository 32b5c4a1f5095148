//! Cart store.
//!
//! [`CartStore`] is the single source of truth for the shopper's cart. It is
//! an owned value passed to whoever needs it; all mutation goes through its
//! methods so every change site is visible. Totals are never stored; they are
//! derived on demand by [`compute_totals`].

pub mod coupon;
pub mod totals;

use macrocart_core::{
    CartLineId, CartLineItem, CartSnapshot, CartTotals, Coupon, CurrencyCode, Variant,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::PricingConfig;
use crate::error::{Result, StorefrontError};
use crate::quantity::{ClampedQuantity, StockWarning, clamp_quantity, clamp_to_stock};

pub use coupon::{discount_for, validate_coupon};
pub use totals::compute_totals;

/// Outcome of adding a variant to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddedLine {
    pub line_id: CartLineId,
    /// Line quantity after the add.
    pub quantity: u32,
    pub warning: Option<StockWarning>,
}

/// Everything the payment step needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    pub lines: Vec<CartLineItem>,
    pub totals: CartTotals,
    pub coupon_code: Option<String>,
    pub currency: CurrencyCode,
}

/// The shopper's cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    lines: Vec<CartLineItem>,
    coupon: Option<Coupon>,
    pricing: PricingConfig,
    next_line_id: i32,
}

impl CartStore {
    #[must_use]
    pub const fn new(pricing: PricingConfig) -> Self {
        Self {
            lines: Vec::new(),
            coupon: None,
            pricing,
            next_line_id: 1,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub const fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Current totals, derived from lines, coupon and pricing rules.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::AmountOverflow`] if an amount leaves the
    /// decimal range.
    pub fn totals(&self) -> Result<CartTotals> {
        compute_totals(&self.lines, self.coupon.as_ref(), &self.pricing)
    }

    /// Add `quantity` units of `variant`.
    ///
    /// Adding a variant that is already in the cart increases that line; the
    /// unit price captured on the first add is kept.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NoMatchingVariant`] if the variant is inactive.
    /// - [`StorefrontError::OutOfStock`] if the variant has no stock.
    #[instrument(skip(self, variant), fields(variant_id = %variant.id))]
    pub fn add_item(&mut self, variant: &Variant, quantity: u32) -> Result<AddedLine> {
        if !variant.is_active {
            return Err(StorefrontError::NoMatchingVariant {
                flavor: variant.flavor_id,
                weight: variant.weight_id,
            });
        }
        if !variant.in_stock() {
            return Err(StorefrontError::OutOfStock(variant.id));
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.variant_id == variant.id) {
            let requested = i64::from(line.quantity) + i64::from(quantity);
            let clamped = clamp_quantity(requested, Some(variant));
            line.quantity = clamped.quantity;
            line.max_quantity = Some(variant.quantity);

            info!(line_id = %line.id, quantity = line.quantity, "Increased cart line");
            return Ok(AddedLine {
                line_id: line.id,
                quantity: line.quantity,
                warning: clamped.warning,
            });
        }

        let clamped = clamp_quantity(i64::from(quantity), Some(variant));
        let line = CartLineItem {
            id: self.allocate_line_id(),
            variant_id: variant.id,
            quantity: clamped.quantity,
            unit_price: variant.effective_price(),
            max_quantity: Some(variant.quantity),
        };

        info!(
            line_id = %line.id,
            quantity = line.quantity,
            unit_price = %line.unit_price,
            "Added cart line"
        );
        let added = AddedLine {
            line_id: line.id,
            quantity: line.quantity,
            warning: clamped.warning,
        };
        self.lines.push(line);
        Ok(added)
    }

    /// Change a line's quantity, clamped to `[1, stock seen at add]`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::LineNotFound`] if the line does not exist.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, line_id: CartLineId, requested: i64) -> Result<ClampedQuantity> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(StorefrontError::LineNotFound(line_id))?;

        let clamped = clamp_to_stock(requested, line.max_quantity);
        line.quantity = clamped.quantity;

        info!(quantity = line.quantity, "Updated cart line");
        Ok(clamped)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::LineNotFound`] if the line does not exist.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, line_id: CartLineId) -> Result<CartLineItem> {
        let position = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or(StorefrontError::LineNotFound(line_id))?;

        let removed = self.lines.remove(position);
        info!(variant_id = %removed.variant_id, "Removed cart line");
        Ok(removed)
    }

    /// Hold a coupon in cart state, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::CouponInvalid`] if validation fails. The
    /// cart, including any previously applied coupon, is left unchanged.
    #[instrument(skip(self, coupon), fields(code = %coupon.code))]
    pub fn apply_coupon(&mut self, coupon: &Coupon) -> Result<&Coupon> {
        let valid = validate_coupon(coupon)?;
        info!(
            discount_type = %valid.discount_type,
            value = %valid.value,
            "Applied coupon"
        );
        Ok(self.coupon.insert(valid))
    }

    /// Drop the applied coupon, if any.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        let removed = self.coupon.take();
        if let Some(coupon) = &removed {
            info!(code = %coupon.code, "Removed coupon");
        }
        removed
    }

    /// Remove all lines and the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
        info!("Cleared cart");
    }

    /// Replace cart contents with a backend snapshot.
    ///
    /// Lines with a zero quantity are raised to 1.
    pub fn sync_snapshot(&mut self, snapshot: CartSnapshot) {
        let mut items = snapshot.items;
        for line in &mut items {
            if line.quantity == 0 {
                warn!(line_id = %line.id, "Snapshot line has zero quantity");
                line.quantity = 1;
            }
        }

        self.next_line_id = items
            .iter()
            .map(|l| l.id.as_i32())
            .max()
            .and_then(|max| max.checked_add(1))
            .unwrap_or(1);
        self.lines = items;
        self.coupon = snapshot.coupon;
        debug!(lines = self.lines.len(), "Synced cart snapshot");
    }

    /// Validate the cart for payment.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::EmptyCart`] if there are no lines.
    /// - [`StorefrontError::CheckoutBelowMinimum`] if the total is below the
    ///   configured minimum.
    /// - [`StorefrontError::AmountOverflow`] if the totals cannot be computed.
    #[instrument(skip(self))]
    pub fn checkout(&self) -> Result<CheckoutSummary> {
        if self.lines.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        let totals = self.totals()?;
        if totals.total < self.pricing.min_checkout_total {
            return Err(StorefrontError::CheckoutBelowMinimum {
                total: totals.total,
                minimum: self.pricing.min_checkout_total,
            });
        }

        Ok(CheckoutSummary {
            lines: self.lines.clone(),
            totals,
            coupon_code: self.coupon.as_ref().map(|c| c.code.clone()),
            currency: self.pricing.currency,
        })
    }

    /// Next id not held by any line. Wraps to 1 past `i32::MAX`.
    fn allocate_line_id(&mut self) -> CartLineId {
        let mut candidate = self.next_line_id.max(1);
        while self.lines.iter().any(|l| l.id.as_i32() == candidate) {
            candidate = candidate.checked_add(1).unwrap_or(1);
        }
        self.next_line_id = candidate.checked_add(1).unwrap_or(1);
        CartLineId::new(candidate)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
