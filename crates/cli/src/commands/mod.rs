//! CLI command implementations.

pub mod fetch;
pub mod resolve;
pub mod totals;

use std::io::Write;
use std::path::Path;

use macrocart_core::{FlavorId, VariantId, WeightId};
use macrocart_storefront::StorefrontError;
use macrocart_storefront::backend::BackendError;
use macrocart_storefront::catalog::{AddToCartState, ProductSelection, SelectionState};
use macrocart_storefront::config::ConfigError;
use macrocart_storefront::quantity::StockWarning;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML input failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend request failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Storefront rule rejected the input.
    #[error(transparent)]
    Storefront(#[from] StorefrontError),
}

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Write `value` to stdout as pretty JSON when `--json` is set.
    ///
    /// Returns `true` if output was written.
    pub fn emit<T: Serialize>(self, value: &T) -> Result<bool, CommandError> {
        if !self.json {
            return Ok(false);
        }
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, value)?;
        writeln!(stdout)?;
        Ok(true)
    }
}

pub fn read_file(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Outcome of applying CLI choices to a product selection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    pub product: String,
    pub state: SelectionState,
    pub variant: Option<VariantId>,
    pub price: Option<Decimal>,
    pub on_sale: bool,
    pub quantity: u32,
    pub warning: Option<StockWarning>,
    pub add_to_cart: AddToCartState,
    pub available_flavors: Vec<FlavorId>,
    pub available_weights: Vec<WeightId>,
}

/// Apply flavor, weight and quantity choices in that order.
pub fn apply_choices(
    selection: &mut ProductSelection,
    flavor: Option<FlavorId>,
    weight: Option<WeightId>,
    quantity: Option<i64>,
) -> ResolveReport {
    if let Some(flavor) = flavor {
        selection.select_flavor(flavor);
    }
    if let Some(weight) = weight {
        selection.select_weight(weight);
    }
    let warning = quantity.and_then(|q| selection.set_quantity(q).warning);

    let variant = selection.selected_variant();
    ResolveReport {
        product: selection.product().slug.clone(),
        state: selection.state(),
        variant: variant.map(|v| v.id),
        price: variant.map(macrocart_core::Variant::effective_price),
        on_sale: variant.is_some_and(macrocart_core::Variant::is_on_sale),
        quantity: selection.quantity(),
        warning,
        add_to_cart: selection.add_to_cart_state(),
        available_flavors: selection.available_flavors().iter().map(|f| f.id).collect(),
        available_weights: selection.available_weights().iter().map(|w| w.id).collect(),
    }
}

pub fn log_report(report: &ResolveReport) {
    info!(
        product = %report.product,
        state = ?report.state,
        variant = ?report.variant,
        price = ?report.price,
        on_sale = report.on_sale,
        quantity = report.quantity,
        add_to_cart = ?report.add_to_cart,
        "Resolved selection"
    );
    if let Some(warning) = report.warning {
        info!("{warning}");
    }
}
