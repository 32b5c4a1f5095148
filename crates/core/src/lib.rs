//! Macrocart Core - Shared types library.
//!
//! This crate provides the types used across all Macrocart components:
//! - `storefront` - Variant resolution, cart pricing and the backend REST client
//! - `cli` - Command-line tools for inspecting products and carts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no pricing
//! rules. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and the product catalog data model

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
