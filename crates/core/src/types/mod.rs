//! Core types for Macrocart.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{CartLineItem, CartSnapshot, CartTotals, Coupon, DiscountType};
pub use catalog::{FlavorOption, Product, ProductEnvelope, Variant, VariantImage, WeightOption};
pub use id::*;
pub use price::{CurrencyCode, MONEY_SCALE, Price, round_money};
