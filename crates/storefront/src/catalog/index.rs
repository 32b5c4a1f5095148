//! Active (flavor, weight) → variant combinations.

use std::collections::HashSet;

use macrocart_core::{FlavorId, Variant, WeightId};

/// An active variant keyed by its option pair.
///
/// Either ID is `None` when the product lacks that dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub flavor_id: Option<FlavorId>,
    pub weight_id: Option<WeightId>,
    pub variant: Variant,
}

impl Combination {
    /// Whether this combination matches the given option pair exactly.
    #[must_use]
    pub fn matches(&self, flavor: Option<FlavorId>, weight: Option<WeightId>) -> bool {
        self.flavor_id == flavor && self.weight_id == weight
    }
}

/// Build one combination per active variant.
///
/// Inactive variants are dropped. If the backend sends two active variants
/// for the same option pair, the first one wins.
#[must_use]
pub fn build_combinations(variants: &[Variant]) -> Vec<Combination> {
    let mut seen = HashSet::new();
    let mut combinations = Vec::with_capacity(variants.len());

    for variant in variants.iter().filter(|v| v.is_active) {
        let key = (variant.flavor_id, variant.weight_id);
        if !seen.insert(key) {
            tracing::warn!(
                variant_id = %variant.id,
                flavor_id = ?variant.flavor_id,
                weight_id = ?variant.weight_id,
                "Duplicate active variant for option pair, ignoring"
            );
            continue;
        }
        combinations.push(Combination {
            flavor_id: variant.flavor_id,
            weight_id: variant.weight_id,
            variant: variant.clone(),
        });
    }

    combinations
}

/// Lookup structure over a product's active combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinationIndex {
    combinations: Vec<Combination>,
}

impl CombinationIndex {
    #[must_use]
    pub fn new(variants: &[Variant]) -> Self {
        Self {
            combinations: build_combinations(variants),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combination> {
        self.combinations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Exact lookup by option pair.
    #[must_use]
    pub fn find(&self, flavor: Option<FlavorId>, weight: Option<WeightId>) -> Option<&Combination> {
        self.combinations.iter().find(|c| c.matches(flavor, weight))
    }

    /// Weight IDs that have an active variant for `flavor`.
    pub fn weights_for_flavor(&self, flavor: FlavorId) -> impl Iterator<Item = WeightId> + '_ {
        self.combinations
            .iter()
            .filter(move |c| c.flavor_id == Some(flavor))
            .filter_map(|c| c.weight_id)
    }

    /// Flavor IDs that have an active variant for `weight`.
    pub fn flavors_for_weight(&self, weight: WeightId) -> impl Iterator<Item = FlavorId> + '_ {
        self.combinations
            .iter()
            .filter(move |c| c.weight_id == Some(weight))
            .filter_map(|c| c.flavor_id)
    }

    /// Whether any active variant carries `flavor`.
    #[must_use]
    pub fn has_flavor(&self, flavor: FlavorId) -> bool {
        self.combinations.iter().any(|c| c.flavor_id == Some(flavor))
    }

    /// Whether any active variant carries `weight`.
    #[must_use]
    pub fn has_weight(&self, weight: WeightId) -> bool {
        self.combinations.iter().any(|c| c.weight_id == Some(weight))
    }
}
