//! Flavor/weight selection as an explicit state machine.
//!
//! Each shopper action is one transition method on [`ProductSelection`]:
//! [`select_flavor`](ProductSelection::select_flavor),
//! [`select_weight`](ProductSelection::select_weight),
//! [`auto_select`](ProductSelection::auto_select) and
//! [`reset`](ProductSelection::reset). After every transition the selected
//! weight is compatible with the selected flavor.
//!
//! Whenever a counterpart option has to be picked, the first compatible
//! option in the product's declared option order wins. Backend variant order
//! never decides a default.

use std::sync::Arc;

use macrocart_core::{FlavorId, FlavorOption, Product, Variant, VariantId, WeightId, WeightOption};
use serde::Serialize;
use tracing::debug;

use crate::catalog::index::{Combination, CombinationIndex};
use crate::error::{Result, StorefrontError};
use crate::quantity::{ClampedQuantity, clamp_quantity};

/// Where the shopper is in choosing a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SelectionState {
    /// Nothing chosen yet.
    Unselected,
    /// Flavor chosen; no declared weight is compatible with it yet.
    FlavorOnly { flavor: FlavorId },
    /// Weight chosen; no declared flavor is compatible with it yet.
    WeightOnly { weight: WeightId },
    /// A concrete variant is resolved.
    FullySelected {
        flavor: Option<FlavorId>,
        weight: Option<WeightId>,
        variant: VariantId,
    },
    /// The chosen option has no active variant.
    NoMatch {
        flavor: Option<FlavorId>,
        weight: Option<WeightId>,
    },
}

impl SelectionState {
    #[must_use]
    pub const fn flavor(&self) -> Option<FlavorId> {
        match *self {
            Self::Unselected | Self::WeightOnly { .. } => None,
            Self::FlavorOnly { flavor } => Some(flavor),
            Self::FullySelected { flavor, .. } | Self::NoMatch { flavor, .. } => flavor,
        }
    }

    #[must_use]
    pub const fn weight(&self) -> Option<WeightId> {
        match *self {
            Self::Unselected | Self::FlavorOnly { .. } => None,
            Self::WeightOnly { weight } => Some(weight),
            Self::FullySelected { weight, .. } | Self::NoMatch { weight, .. } => weight,
        }
    }

    #[must_use]
    pub const fn variant(&self) -> Option<VariantId> {
        match *self {
            Self::FullySelected { variant, .. } => Some(variant),
            _ => None,
        }
    }

    const fn resolved(combination: &Combination) -> Self {
        Self::FullySelected {
            flavor: combination.flavor_id,
            weight: combination.weight_id,
            variant: combination.variant.id,
        }
    }
}

/// What the add-to-cart control should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AddToCartState {
    /// A variant with stock is selected.
    Purchasable { variant: VariantId, available: u32 },
    /// The selected variant has no stock.
    OutOfStock { variant: VariantId },
    /// No variant is resolved.
    Unavailable,
}

/// Selection state for one product, plus the quantity picker.
#[derive(Debug, Clone)]
pub struct ProductSelection {
    product: Arc<Product>,
    index: CombinationIndex,
    state: SelectionState,
    quantity: u32,
}

impl ProductSelection {
    /// Start an empty selection.
    #[must_use]
    pub fn new(product: Arc<Product>) -> Self {
        let index = CombinationIndex::new(&product.variants);
        Self {
            product,
            index,
            state: SelectionState::Unselected,
            quantity: 1,
        }
    }

    /// Start a selection and apply the initial auto-selection.
    #[must_use]
    pub fn for_product(product: Arc<Product>) -> Self {
        let mut selection = Self::new(product);
        selection.auto_select();
        selection
    }

    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub const fn index(&self) -> &CombinationIndex {
        &self.index
    }

    #[must_use]
    pub const fn state(&self) -> SelectionState {
        self.state
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The resolved variant, if any.
    #[must_use]
    pub fn selected_variant(&self) -> Option<&Variant> {
        let id = self.state.variant()?;
        self.index
            .iter()
            .find(|c| c.variant.id == id)
            .map(|c| &c.variant)
    }

    #[must_use]
    pub fn selected_flavor(&self) -> Option<&FlavorOption> {
        self.state.flavor().and_then(|id| self.product.flavor(id))
    }

    #[must_use]
    pub fn selected_weight(&self) -> Option<&WeightOption> {
        self.state.weight().and_then(|id| self.product.weight(id))
    }

    /// Look up the active variant for an option pair without changing state.
    ///
    /// A dimension the product does not declare is ignored, so a flavor-only
    /// product resolves from the flavor alone.
    #[must_use]
    pub fn resolve_variant(
        &self,
        flavor: Option<FlavorId>,
        weight: Option<WeightId>,
    ) -> Option<&Variant> {
        self.lookup(flavor, weight).map(|c| &c.variant)
    }

    /// Declared weights that have an active variant for the selected flavor.
    ///
    /// With no flavor selected, every weight that has any active variant.
    #[must_use]
    pub fn available_weights(&self) -> Vec<&WeightOption> {
        let flavor = self.state.flavor();
        self.product
            .weight_options
            .iter()
            .filter(|w| match flavor {
                Some(f) => self.index.weights_for_flavor(f).any(|id| id == w.id),
                None => self.index.has_weight(w.id),
            })
            .collect()
    }

    /// Declared flavors that have an active variant for the selected weight.
    ///
    /// With no weight selected, every flavor that has any active variant.
    #[must_use]
    pub fn available_flavors(&self) -> Vec<&FlavorOption> {
        let weight = self.state.weight();
        self.product
            .flavor_options
            .iter()
            .filter(|f| match weight {
                Some(w) => self.index.flavors_for_weight(w).any(|id| id == f.id),
                None => self.index.has_flavor(f.id),
            })
            .collect()
    }

    /// Shopper picked a flavor.
    pub fn select_flavor(&mut self, flavor: FlavorId) -> SelectionState {
        let next = self.flavor_transition(flavor);
        self.transition("select_flavor", next)
    }

    /// Shopper picked a weight.
    pub fn select_weight(&mut self, weight: WeightId) -> SelectionState {
        let next = self.weight_transition(weight);
        self.transition("select_weight", next)
    }

    /// Pick the default selection for a freshly loaded product.
    ///
    /// Products with options take the first in-stock combination in declared
    /// order (flavors outer, weights inner); if nothing has stock, the state
    /// stays [`SelectionState::Unselected`]. Products without options take
    /// the first in-stock active variant, else the first active variant.
    pub fn auto_select(&mut self) -> SelectionState {
        let next = if self.product.has_options() {
            self.declared_combinations()
                .find(|c| c.variant.in_stock())
                .map_or(SelectionState::Unselected, SelectionState::resolved)
        } else {
            self.index
                .iter()
                .find(|c| c.variant.in_stock())
                .or_else(|| self.index.iter().next())
                .map_or(SelectionState::Unselected, SelectionState::resolved)
        };
        self.transition("auto_select", next)
    }

    /// Clear the selection.
    pub fn reset(&mut self) -> SelectionState {
        self.transition("reset", SelectionState::Unselected)
    }

    /// Set the quantity picker, clamped to the selected variant's stock.
    pub fn set_quantity(&mut self, requested: i64) -> ClampedQuantity {
        let clamped = clamp_quantity(requested, self.selected_variant());
        self.quantity = clamped.quantity;
        clamped
    }

    /// What the add-to-cart control should show for the current state.
    #[must_use]
    pub fn add_to_cart_state(&self) -> AddToCartState {
        match self.selected_variant() {
            Some(v) if v.in_stock() => AddToCartState::Purchasable {
                variant: v.id,
                available: v.quantity,
            },
            Some(v) => AddToCartState::OutOfStock { variant: v.id },
            None => AddToCartState::Unavailable,
        }
    }

    /// The selected variant, provided it can be bought.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NoMatchingVariant`] if no variant is resolved.
    /// - [`StorefrontError::OutOfStock`] if the resolved variant has no stock.
    pub fn require_purchasable(&self) -> Result<&Variant> {
        let variant = self
            .selected_variant()
            .ok_or(StorefrontError::NoMatchingVariant {
                flavor: self.state.flavor(),
                weight: self.state.weight(),
            })?;
        if !variant.in_stock() {
            return Err(StorefrontError::OutOfStock(variant.id));
        }
        Ok(variant)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn flavor_transition(&self, flavor: FlavorId) -> SelectionState {
        if self.product.flavor(flavor).is_none() {
            return SelectionState::NoMatch {
                flavor: Some(flavor),
                weight: None,
            };
        }

        if self.product.weight_options.is_empty() {
            return self.lookup(Some(flavor), None).map_or(
                SelectionState::NoMatch {
                    flavor: Some(flavor),
                    weight: None,
                },
                SelectionState::resolved,
            );
        }

        let available: Vec<WeightId> = self.index.weights_for_flavor(flavor).collect();
        if available.is_empty() {
            return SelectionState::NoMatch {
                flavor: Some(flavor),
                weight: None,
            };
        }

        let weight = self
            .state
            .weight()
            .filter(|w| available.contains(w))
            .or_else(|| {
                self.product
                    .weight_options
                    .iter()
                    .map(|w| w.id)
                    .find(|id| available.contains(id))
            });

        match weight {
            Some(weight) => self.lookup(Some(flavor), Some(weight)).map_or(
                SelectionState::NoMatch {
                    flavor: Some(flavor),
                    weight: None,
                },
                SelectionState::resolved,
            ),
            None => SelectionState::FlavorOnly { flavor },
        }
    }

    fn weight_transition(&self, weight: WeightId) -> SelectionState {
        if self.product.weight(weight).is_none() {
            return SelectionState::NoMatch {
                flavor: None,
                weight: Some(weight),
            };
        }

        if self.product.flavor_options.is_empty() {
            return self.lookup(None, Some(weight)).map_or(
                SelectionState::NoMatch {
                    flavor: None,
                    weight: Some(weight),
                },
                SelectionState::resolved,
            );
        }

        let available: Vec<FlavorId> = self.index.flavors_for_weight(weight).collect();
        if available.is_empty() {
            return SelectionState::NoMatch {
                flavor: None,
                weight: Some(weight),
            };
        }

        let flavor = self
            .state
            .flavor()
            .filter(|f| available.contains(f))
            .or_else(|| {
                self.product
                    .flavor_options
                    .iter()
                    .map(|f| f.id)
                    .find(|id| available.contains(id))
            });

        match flavor {
            Some(flavor) => self.lookup(Some(flavor), Some(weight)).map_or(
                SelectionState::NoMatch {
                    flavor: None,
                    weight: Some(weight),
                },
                SelectionState::resolved,
            ),
            None => SelectionState::WeightOnly { weight },
        }
    }

    /// Apply `next`, resetting the quantity when the resolved variant changes.
    fn transition(&mut self, action: &'static str, next: SelectionState) -> SelectionState {
        let previous = self.state;
        if previous.variant() != next.variant() {
            self.quantity = 1;
        }
        self.state = next;

        debug!(
            product = %self.product.slug,
            action,
            from = ?previous,
            to = ?next,
            "Selection transition"
        );
        next
    }

    /// Combination lookup that ignores dimensions the product does not declare.
    fn lookup(&self, flavor: Option<FlavorId>, weight: Option<WeightId>) -> Option<&Combination> {
        let ignore_flavor = self.product.flavor_options.is_empty();
        let ignore_weight = self.product.weight_options.is_empty();
        self.index.iter().find(|c| {
            (ignore_flavor || c.flavor_id == flavor) && (ignore_weight || c.weight_id == weight)
        })
    }

    /// Active combinations in declared option order.
    fn declared_combinations(&self) -> impl Iterator<Item = &Combination> + '_ {
        let flavors: Vec<Option<FlavorId>> = if self.product.flavor_options.is_empty() {
            vec![None]
        } else {
            self.product.flavor_options.iter().map(|f| Some(f.id)).collect()
        };
        let weights: Vec<Option<WeightId>> = if self.product.weight_options.is_empty() {
            vec![None]
        } else {
            self.product.weight_options.iter().map(|w| Some(w.id)).collect()
        };

        flavors
            .into_iter()
            .flat_map(move |f| weights.clone().into_iter().map(move |w| (f, w)))
            .filter_map(move |(f, w)| self.lookup(f, w))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use macrocart_core::ProductId;

    fn flavor(id: i32, name: &str) -> FlavorOption {
        FlavorOption {
            id: FlavorId::new(id),
            name: name.to_string(),
        }
    }

    fn weight(id: i32, kg: i64) -> WeightOption {
        WeightOption {
            id: WeightId::new(id),
            value: Decimal::from(kg),
            unit: "kg".to_string(),
        }
    }

    fn variant(id: i32, f: Option<i32>, w: Option<i32>, stock: u32, active: bool) -> Variant {
        Variant {
            id: VariantId::new(id),
            flavor_id: f.map(FlavorId::new),
            weight_id: w.map(WeightId::new),
            price: Decimal::from(1000 + i64::from(id)),
            sale_price: None,
            quantity: stock,
            is_active: active,
            images: Vec::new(),
        }
    }

    fn product(
        flavors: Vec<FlavorOption>,
        weights: Vec<WeightOption>,
        variants: Vec<Variant>,
    ) -> Arc<Product> {
        Arc::new(Product {
            id: ProductId::new(1),
            slug: "whey".to_string(),
            name: "Whey".to_string(),
            base_price: Decimal::from(1000),
            regular_price: None,
            has_sale: false,
            flavor_options: flavors,
            weight_options: weights,
            variants,
        })
    }

    const CHOC: i32 = 1;
    const VAN: i32 = 2;
    const KG1: i32 = 10;
    const KG2: i32 = 20;

    /// Chocolate/Vanilla × 1kg/2kg with only (Chocolate,1kg) and (Vanilla,2kg) active.
    fn diagonal_product() -> Arc<Product> {
        product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            vec![weight(KG1, 1), weight(KG2, 2)],
            vec![
                variant(100, Some(CHOC), Some(KG1), 5, true),
                variant(101, Some(CHOC), Some(KG2), 5, false),
                variant(102, Some(VAN), Some(KG1), 5, false),
                variant(103, Some(VAN), Some(KG2), 5, true),
            ],
        )
    }

    fn assert_compatible(selection: &ProductSelection) {
        let state = selection.state();
        if let (Some(f), Some(w)) = (state.flavor(), state.weight()) {
            assert!(
                selection.index().find(Some(f), Some(w)).is_some(),
                "incompatible pair after transition: {state:?}"
            );
        }
    }

    #[test]
    fn test_selecting_vanilla_resolves_only_compatible_weight() {
        let mut selection = ProductSelection::for_product(diagonal_product());
        assert_eq!(selection.state().variant(), Some(VariantId::new(100)));

        let state = selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(state.weight(), Some(WeightId::new(KG2)));
        assert_eq!(state.variant(), Some(VariantId::new(103)));
        assert_compatible(&selection);
    }

    #[test]
    fn test_select_weight_is_symmetric() {
        let mut selection = ProductSelection::for_product(diagonal_product());

        let state = selection.select_weight(WeightId::new(KG2));
        assert_eq!(state.flavor(), Some(FlavorId::new(VAN)));
        assert_eq!(state.variant(), Some(VariantId::new(103)));

        let state = selection.select_weight(WeightId::new(KG1));
        assert_eq!(state.flavor(), Some(FlavorId::new(CHOC)));
        assert_eq!(state.variant(), Some(VariantId::new(100)));
        assert_compatible(&selection);
    }

    #[test]
    fn test_keeps_current_weight_when_compatible() {
        let p = product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            vec![weight(KG1, 1), weight(KG2, 2)],
            vec![
                variant(100, Some(CHOC), Some(KG1), 5, true),
                variant(101, Some(CHOC), Some(KG2), 5, true),
                variant(102, Some(VAN), Some(KG1), 5, true),
                variant(103, Some(VAN), Some(KG2), 5, true),
            ],
        );
        let mut selection = ProductSelection::for_product(p);
        selection.select_weight(WeightId::new(KG2));
        assert_eq!(selection.state().variant(), Some(VariantId::new(101)));

        let state = selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(state.weight(), Some(WeightId::new(KG2)));
        assert_eq!(state.variant(), Some(VariantId::new(103)));
    }

    #[test]
    fn test_counterpart_follows_declared_order_not_backend_order() {
        // Backend lists the 2kg variant first, but 1kg is declared first.
        let p = product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            vec![weight(KG1, 1), weight(KG2, 2)],
            vec![
                variant(200, Some(VAN), Some(KG2), 5, true),
                variant(201, Some(VAN), Some(KG1), 5, true),
                variant(202, Some(CHOC), Some(KG2), 0, true),
            ],
        );
        let mut selection = ProductSelection::new(p);
        let state = selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(state.weight(), Some(WeightId::new(KG1)));
        assert_eq!(state.variant(), Some(VariantId::new(201)));
    }

    #[test]
    fn test_flavor_without_active_variants_is_no_match() {
        let p = product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            vec![weight(KG1, 1)],
            vec![
                variant(100, Some(CHOC), Some(KG1), 5, true),
                variant(101, Some(VAN), Some(KG1), 5, false),
            ],
        );
        let mut selection = ProductSelection::for_product(p);
        let state = selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(
            state,
            SelectionState::NoMatch {
                flavor: Some(FlavorId::new(VAN)),
                weight: None,
            }
        );
        assert!(selection.selected_variant().is_none());
        assert_eq!(selection.add_to_cart_state(), AddToCartState::Unavailable);
        assert!(matches!(
            selection.require_purchasable(),
            Err(StorefrontError::NoMatchingVariant { .. })
        ));
    }

    #[test]
    fn test_undeclared_flavor_is_no_match() {
        let mut selection = ProductSelection::for_product(diagonal_product());
        let state = selection.select_flavor(FlavorId::new(99));
        assert!(matches!(state, SelectionState::NoMatch { .. }));
    }

    #[test]
    fn test_compatible_weight_not_declared_leaves_flavor_only() {
        // Variant references weight 30, which is not a declared weight option.
        let p = product(
            vec![flavor(CHOC, "Chocolate")],
            vec![weight(KG1, 1)],
            vec![variant(100, Some(CHOC), Some(30), 5, true)],
        );
        let mut selection = ProductSelection::new(p);
        let state = selection.select_flavor(FlavorId::new(CHOC));
        assert_eq!(
            state,
            SelectionState::FlavorOnly {
                flavor: FlavorId::new(CHOC)
            }
        );
        assert!(selection.selected_variant().is_none());
    }

    #[test]
    fn test_flavor_only_product_resolves_from_single_choice() {
        let p = product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            Vec::new(),
            vec![
                variant(100, Some(CHOC), None, 5, true),
                variant(101, Some(VAN), None, 5, true),
            ],
        );
        let mut selection = ProductSelection::new(p);
        let state = selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(state.variant(), Some(VariantId::new(101)));
        assert_eq!(state.weight(), None);
    }

    #[test]
    fn test_weight_only_product_resolves_from_single_choice() {
        let p = product(
            Vec::new(),
            vec![weight(KG1, 1), weight(KG2, 2)],
            vec![
                variant(100, None, Some(KG1), 5, true),
                variant(101, None, Some(KG2), 5, true),
            ],
        );
        let mut selection = ProductSelection::for_product(p);
        assert_eq!(selection.state().variant(), Some(VariantId::new(100)));

        let state = selection.select_weight(WeightId::new(KG2));
        assert_eq!(state.variant(), Some(VariantId::new(101)));
        assert_eq!(
            selection.resolve_variant(None, Some(WeightId::new(KG1))).unwrap().id,
            VariantId::new(100)
        );
    }

    #[test]
    fn test_no_options_prefers_first_in_stock_variant() {
        let p = product(
            Vec::new(),
            Vec::new(),
            vec![
                variant(100, None, None, 0, true),
                variant(101, None, None, 3, true),
            ],
        );
        let selection = ProductSelection::for_product(p);
        assert_eq!(selection.state().variant(), Some(VariantId::new(101)));
    }

    #[test]
    fn test_no_options_falls_back_to_first_active_variant() {
        let p = product(
            Vec::new(),
            Vec::new(),
            vec![
                variant(100, None, None, 0, false),
                variant(101, None, None, 0, true),
            ],
        );
        let selection = ProductSelection::for_product(p);
        assert_eq!(selection.state().variant(), Some(VariantId::new(101)));
        assert_eq!(
            selection.add_to_cart_state(),
            AddToCartState::OutOfStock {
                variant: VariantId::new(101)
            }
        );
        assert!(matches!(
            selection.require_purchasable(),
            Err(StorefrontError::OutOfStock(_))
        ));
    }

    #[test]
    fn test_no_options_and_no_variants_selects_nothing() {
        let selection = ProductSelection::for_product(product(Vec::new(), Vec::new(), Vec::new()));
        assert_eq!(selection.state(), SelectionState::Unselected);
    }

    #[test]
    fn test_auto_select_skips_out_of_stock_in_declared_order() {
        let p = product(
            vec![flavor(CHOC, "Chocolate"), flavor(VAN, "Vanilla")],
            vec![weight(KG1, 1), weight(KG2, 2)],
            vec![
                variant(103, Some(VAN), Some(KG1), 9, true),
                variant(100, Some(CHOC), Some(KG1), 0, true),
                variant(101, Some(CHOC), Some(KG2), 4, true),
            ],
        );
        let selection = ProductSelection::for_product(p);
        assert_eq!(selection.state().variant(), Some(VariantId::new(101)));
        assert_eq!(selection.selected_flavor().unwrap().name, "Chocolate");
        assert_eq!(selection.selected_weight().unwrap().label(), "2 kg");
    }

    #[test]
    fn test_auto_select_with_nothing_in_stock_stays_unselected() {
        let p = product(
            vec![flavor(CHOC, "Chocolate")],
            vec![weight(KG1, 1)],
            vec![variant(100, Some(CHOC), Some(KG1), 0, true)],
        );
        let selection = ProductSelection::for_product(p);
        assert_eq!(selection.state(), SelectionState::Unselected);
        assert_eq!(selection.add_to_cart_state(), AddToCartState::Unavailable);
    }

    #[test]
    fn test_quantity_resets_when_variant_changes() {
        let mut selection = ProductSelection::for_product(diagonal_product());
        let clamped = selection.set_quantity(3);
        assert_eq!(clamped.quantity, 3);
        assert_eq!(selection.quantity(), 3);

        // Same variant: quantity kept.
        selection.select_flavor(FlavorId::new(CHOC));
        assert_eq!(selection.quantity(), 3);

        selection.select_flavor(FlavorId::new(VAN));
        assert_eq!(selection.quantity(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_to_selected_stock() {
        let mut selection = ProductSelection::for_product(diagonal_product());
        let clamped = selection.set_quantity(50);
        assert_eq!(clamped.quantity, 5);
        assert!(clamped.warning.is_some());
        assert_eq!(selection.quantity(), 5);
    }

    #[test]
    fn test_available_options_follow_selection() {
        let mut selection = ProductSelection::new(diagonal_product());
        assert_eq!(selection.available_weights().len(), 2);

        selection.select_flavor(FlavorId::new(VAN));
        let weights: Vec<_> = selection.available_weights().iter().map(|w| w.id).collect();
        assert_eq!(weights, vec![WeightId::new(KG2)]);

        let flavors: Vec<_> = selection.available_flavors().iter().map(|f| f.id).collect();
        assert_eq!(flavors, vec![FlavorId::new(VAN)]);
    }

    #[test]
    fn test_invariant_holds_across_every_transition() {
        let p = product(
            vec![flavor(1, "A"), flavor(2, "B"), flavor(3, "C")],
            vec![weight(10, 1), weight(20, 2), weight(30, 3)],
            vec![
                variant(1, Some(1), Some(10), 1, true),
                variant(2, Some(1), Some(30), 1, true),
                variant(3, Some(2), Some(20), 0, true),
                variant(4, Some(3), Some(30), 1, true),
                variant(5, Some(3), Some(10), 1, false),
            ],
        );
        let mut selection = ProductSelection::for_product(p);
        let actions: [(bool, i32); 10] = [
            (true, 2),
            (false, 10),
            (true, 3),
            (false, 20),
            (true, 1),
            (false, 30),
            (true, 2),
            (false, 30),
            (true, 99),
            (false, 10),
        ];
        for (is_flavor, id) in actions {
            if is_flavor {
                selection.select_flavor(FlavorId::new(id));
            } else {
                selection.select_weight(WeightId::new(id));
            }
            assert_compatible(&selection);
        }
    }

    #[test]
    fn test_reset_returns_to_unselected() {
        let mut selection = ProductSelection::for_product(diagonal_product());
        selection.set_quantity(2);
        assert_eq!(selection.reset(), SelectionState::Unselected);
        assert_eq!(selection.quantity(), 1);
    }
}
