//! Variant lookup and flavor/weight selection.
//!
//! [`index`] turns a product's raw variant list into active (flavor, weight)
//! combinations. [`selection`] drives the shopper's choices over those
//! combinations as an explicit state machine.

pub mod index;
pub mod selection;

pub use index::{Combination, CombinationIndex, build_combinations};
pub use selection::{AddToCartState, ProductSelection, SelectionState};
