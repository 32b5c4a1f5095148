//! Product catalog data model.
//!
//! These mirror the backend's `GET /public/products/{slug}` payload. Catalog
//! data is read-only on the client: it is owned by the backend and replaced
//! wholesale on every fetch.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{FlavorId, ProductId, VariantId, WeightId};

/// A product with its selectable options and purchasable variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    /// Price shown before a variant is chosen.
    pub base_price: Decimal,
    /// Pre-sale price, shown struck through when `has_sale` is set.
    #[serde(default)]
    pub regular_price: Option<Decimal>,
    #[serde(default)]
    pub has_sale: bool,
    /// Flavor options in display order.
    #[serde(default)]
    pub flavor_options: Vec<FlavorOption>,
    /// Weight options in display order.
    #[serde(default)]
    pub weight_options: Vec<WeightOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Whether the product is sold in more than one flavor or weight.
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.flavor_options.is_empty() || !self.weight_options.is_empty()
    }

    /// Look up a declared flavor option.
    #[must_use]
    pub fn flavor(&self, id: FlavorId) -> Option<&FlavorOption> {
        self.flavor_options.iter().find(|f| f.id == id)
    }

    /// Look up a declared weight option.
    #[must_use]
    pub fn weight(&self, id: WeightId) -> Option<&WeightOption> {
        self.weight_options.iter().find(|w| w.id == id)
    }

    /// Look up a variant by ID, active or not.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

/// A flavor the product is offered in (e.g., "Chocolate").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorOption {
    pub id: FlavorId,
    pub name: String,
}

/// A pack size the product is offered in (e.g., 1 kg).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightOption {
    pub id: WeightId,
    pub value: Decimal,
    pub unit: String,
}

impl WeightOption {
    /// Human-readable label such as `"1 kg"` or `"500 g"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.value.normalize(), self.unit)
    }
}

impl fmt::Display for WeightOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A purchasable SKU, distinguished by flavor and/or weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    /// `None` when the product has no flavor dimension.
    #[serde(default)]
    pub flavor_id: Option<FlavorId>,
    /// `None` when the product has no weight dimension.
    #[serde(default)]
    pub weight_id: Option<WeightId>,
    pub price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<VariantImage>,
}

const fn default_true() -> bool {
    true
}

impl Variant {
    /// Whether a sale price below the regular price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.price)
    }

    /// Price a shopper pays per unit right now.
    ///
    /// The sale price wins only when it is strictly below `price`.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The image flagged as primary, falling back to the first image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&VariantImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.first())
    }
}

/// Variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Response envelope for `GET /public/products/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}
