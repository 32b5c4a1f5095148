//! Macrocart Storefront library.
//!
//! Product-variant selection and cart pricing for the storefront, plus a thin
//! client for the backend REST API those pieces are fed from.
//!
//! # Modules
//!
//! - [`catalog`] - Variant index and the flavor/weight selection state machine
//! - [`quantity`] - Quantity clamping against variant stock
//! - [`cart`] - Cart store, coupon validation and totals
//! - [`loader`] - Product fetches guarded against stale responses
//! - [`backend`] - REST client for products, cart and coupons
//! - [`config`] - Environment configuration
//! - [`error`] - Storefront error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod quantity;

pub use error::{Result, StorefrontError};
