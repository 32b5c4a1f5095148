//! Fetch a product from the backend and resolve it.
//!
//! # Usage
//!
//! ```bash
//! mc-cli fetch -s whey-isolate --flavor 2 --weight 5
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_API_BASE_URL` - Backend base URL (required)
//! - `STOREFRONT_API_TOKEN` - Bearer token (optional)

use macrocart_core::{FlavorId, WeightId};
use macrocart_storefront::backend::BackendClient;
use macrocart_storefront::config::BackendConfig;
use macrocart_storefront::loader::ProductLoader;
use tracing::{info, warn};

use super::{CommandError, Output, apply_choices, log_report};

/// Fetch a product by slug and resolve a variant.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub async fn run(
    slug: &str,
    flavor: Option<FlavorId>,
    weight: Option<WeightId>,
    output: Output,
) -> Result<(), CommandError> {
    let config = BackendConfig::from_env()?;
    info!(base_url = %config.base_url, "Connecting to backend");

    let loader = ProductLoader::new(BackendClient::new(&config)?);
    let Some(mut selection) = loader.load_selection(slug).await? else {
        warn!("Product response was superseded");
        return Ok(());
    };

    let report = apply_choices(&mut selection, flavor, weight, None);
    if !output.emit(&report)? {
        log_report(&report);
    }
    Ok(())
}
