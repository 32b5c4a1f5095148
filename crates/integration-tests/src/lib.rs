//! Integration tests for Macrocart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p macrocart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `variant_selection` - Selection state machine over realistic catalogs
//! - `cart_checkout` - Cart store, coupons and checkout rules
//! - `backend_client` - REST client against a `wiremock` server
//!
//! This library holds the shared catalog fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use macrocart_core::{
    FlavorId, FlavorOption, Product, ProductId, Variant, VariantId, WeightId, WeightOption,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

pub const CHOCOLATE: FlavorId = FlavorId::new(1);
pub const VANILLA: FlavorId = FlavorId::new(2);
pub const STRAWBERRY: FlavorId = FlavorId::new(3);

pub const ONE_KG: WeightId = WeightId::new(10);
pub const TWO_KG: WeightId = WeightId::new(20);

#[must_use]
pub fn flavor(id: FlavorId, name: &str) -> FlavorOption {
    FlavorOption {
        id,
        name: name.to_string(),
    }
}

#[must_use]
pub fn weight(id: WeightId, value: i64, unit: &str) -> WeightOption {
    WeightOption {
        id,
        value: Decimal::from(value),
        unit: unit.to_string(),
    }
}

/// Active variant with no sale price.
#[must_use]
pub fn variant(
    id: i32,
    flavor: Option<FlavorId>,
    weight: Option<WeightId>,
    price: i64,
    stock: u32,
) -> Variant {
    Variant {
        id: VariantId::new(id),
        flavor_id: flavor,
        weight_id: weight,
        price: Decimal::from(price),
        sale_price: None,
        quantity: stock,
        is_active: true,
        images: Vec::new(),
    }
}

#[must_use]
pub fn product(
    slug: &str,
    flavors: Vec<FlavorOption>,
    weights: Vec<WeightOption>,
    variants: Vec<Variant>,
) -> Product {
    Product {
        id: ProductId::new(1),
        slug: slug.to_string(),
        name: slug.replace('-', " "),
        base_price: variants.first().map_or(Decimal::ZERO, |v| v.price),
        regular_price: None,
        has_sale: variants.iter().any(Variant::is_on_sale),
        flavor_options: flavors,
        weight_options: weights,
        variants,
    }
}

/// Chocolate and Vanilla in 1 kg and 2 kg, where only Chocolate 1 kg and
/// Vanilla 2 kg are sold.
#[must_use]
pub fn sparse_whey() -> Arc<Product> {
    Arc::new(product(
        "sparse-whey",
        vec![flavor(CHOCOLATE, "Chocolate"), flavor(VANILLA, "Vanilla")],
        vec![weight(ONE_KG, 1, "kg"), weight(TWO_KG, 2, "kg")],
        vec![
            variant(101, Some(CHOCOLATE), Some(ONE_KG), 2499, 12),
            variant(102, Some(VANILLA), Some(TWO_KG), 4499, 3),
        ],
    ))
}

/// Three flavors in two weights with mixed stock and one inactive variant.
#[must_use]
pub fn full_whey() -> Arc<Product> {
    let mut inactive = variant(206, Some(STRAWBERRY), Some(TWO_KG), 4599, 9);
    inactive.is_active = false;

    let mut on_sale = variant(203, Some(VANILLA), Some(ONE_KG), 2599, 4);
    on_sale.sale_price = Some(Decimal::from(2199));

    Arc::new(product(
        "full-whey",
        vec![
            flavor(CHOCOLATE, "Chocolate"),
            flavor(VANILLA, "Vanilla"),
            flavor(STRAWBERRY, "Strawberry"),
        ],
        vec![weight(ONE_KG, 1, "kg"), weight(TWO_KG, 2, "kg")],
        vec![
            variant(201, Some(CHOCOLATE), Some(ONE_KG), 2499, 0),
            variant(202, Some(CHOCOLATE), Some(TWO_KG), 4499, 6),
            on_sale,
            variant(204, Some(VANILLA), Some(TWO_KG), 4499, 2),
            variant(205, Some(STRAWBERRY), Some(ONE_KG), 2599, 8),
            inactive,
        ],
    ))
}

/// Wire form of [`sparse_whey`] as the backend sends it.
#[must_use]
pub fn sparse_whey_json() -> Value {
    json!({
        "product": {
            "id": 1,
            "slug": "sparse-whey",
            "name": "Sparse Whey",
            "basePrice": "2499.00",
            "hasSale": false,
            "flavorOptions": [
                {"id": 1, "name": "Chocolate"},
                {"id": 2, "name": "Vanilla"}
            ],
            "weightOptions": [
                {"id": 10, "value": "1", "unit": "kg"},
                {"id": 20, "value": "2", "unit": "kg"}
            ],
            "variants": [
                {
                    "id": 101,
                    "flavorId": 1,
                    "weightId": 10,
                    "price": "2499.00",
                    "salePrice": null,
                    "quantity": 12,
                    "isActive": true,
                    "images": [{"url": "https://cdn.example.com/choc-1kg.webp", "isPrimary": true}]
                },
                {
                    "id": 102,
                    "flavorId": 2,
                    "weightId": 20,
                    "price": "4499.00",
                    "quantity": 3,
                    "isActive": true
                }
            ]
        }
    })
}
