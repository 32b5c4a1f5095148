//! Macrocart CLI - variant resolution and cart pricing tools.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a variant from a product JSON file
//! mc-cli resolve -p product.json --flavor 2 --weight 5 --quantity 3
//!
//! # Compute totals for a cart file (JSON or YAML)
//! mc-cli totals -c cart.yaml
//!
//! # Fetch a product from the backend and resolve it
//! mc-cli fetch -s whey-isolate --flavor 2
//! ```
//!
//! # Commands
//!
//! - `resolve` - Auto-select and resolve a variant offline
//! - `totals` - Compute cart totals and checkout readiness
//! - `fetch` - Load a product through the REST client
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default `macrocart_storefront=info,mc_cli=info`)
//! - `LOG_FORMAT` - Set to `json` for structured log output
//! - `STOREFRONT_*` - See `macrocart_storefront::config`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use macrocart_core::{FlavorId, WeightId};
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "macrocart_storefront=info,mc_cli=info";

#[derive(Parser)]
#[command(name = "mc-cli")]
#[command(author, version, about = "Macrocart storefront tools")]
struct Cli {
    /// Write the result to stdout as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a variant from a product file
    Resolve {
        /// Path to a product JSON file (bare product or `{"product": ...}`)
        #[arg(short, long)]
        product: PathBuf,

        /// Flavor to select
        #[arg(long)]
        flavor: Option<FlavorId>,

        /// Weight to select
        #[arg(long)]
        weight: Option<WeightId>,

        /// Requested quantity
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,
    },
    /// Compute totals for a cart file
    Totals {
        /// Path to a cart snapshot (JSON or YAML)
        #[arg(short, long)]
        cart: PathBuf,
    },
    /// Fetch a product from the backend and resolve it
    Fetch {
        /// Product slug
        #[arg(short, long)]
        slug: String,

        /// Flavor to select
        #[arg(long)]
        flavor: Option<FlavorId>,

        /// Weight to select
        #[arg(long)]
        weight: Option<WeightId>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading RUST_LOG / LOG_FORMAT
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let output = commands::Output { json: cli.json };

    match cli.command {
        Commands::Resolve {
            product,
            flavor,
            weight,
            quantity,
        } => {
            commands::resolve::run(&product, flavor, weight, quantity, output)?;
        }
        Commands::Totals { cart } => commands::totals::run(&cart, output)?,
        Commands::Fetch {
            slug,
            flavor,
            weight,
        } => commands::fetch::run(&slug, flavor, weight, output).await?,
    }
    Ok(())
}
