//! Offline variant resolution.
//!
//! # Usage
//!
//! ```bash
//! mc-cli resolve -p product.json --flavor 2 --weight 5 --quantity 3
//! mc-cli --json resolve -p product.json
//! ```

use std::path::Path;
use std::sync::Arc;

use macrocart_core::{FlavorId, Product, ProductEnvelope, WeightId};
use macrocart_storefront::catalog::ProductSelection;
use serde::Deserialize;
use tracing::info;

use super::{CommandError, Output, apply_choices, log_report, read_file};

/// Product files may hold the API envelope or a bare product.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductFile {
    Envelope(ProductEnvelope),
    Bare(Product),
}

impl From<ProductFile> for Product {
    fn from(file: ProductFile) -> Self {
        match file {
            ProductFile::Envelope(envelope) => envelope.product,
            ProductFile::Bare(product) => product,
        }
    }
}

/// Resolve a variant from a product file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn run(
    path: &Path,
    flavor: Option<FlavorId>,
    weight: Option<WeightId>,
    quantity: Option<i64>,
    output: Output,
) -> Result<(), CommandError> {
    let content = read_file(path)?;
    let product: Product = serde_json::from_str::<ProductFile>(&content)?.into();

    info!(
        slug = %product.slug,
        variants = product.variants.len(),
        "Loaded product"
    );

    let mut selection = ProductSelection::for_product(Arc::new(product));
    info!(state = ?selection.state(), "Auto-selected");

    let report = apply_choices(&mut selection, flavor, weight, quantity);
    if !output.emit(&report)? {
        log_report(&report);
    }
    Ok(())
}
