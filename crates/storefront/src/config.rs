//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (backend access)
//! - `STOREFRONT_API_BASE_URL` - Base URL of the backend REST API
//!
//! ## Optional
//! - `STOREFRONT_API_TOKEN` - Bearer token sent with backend requests
//! - `STOREFRONT_HTTP_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `STOREFRONT_CACHE_TTL_SECS` - Product cache TTL (default: 300)
//! - `STOREFRONT_CACHE_CAPACITY` - Max cached products (default: 1000)
//! - `STOREFRONT_FREE_SHIPPING_THRESHOLD` - Discounted subtotal that ships free (default: 999)
//! - `STOREFRONT_SHIPPING_FEE` - Flat shipping fee below the threshold (default: 99)
//! - `STOREFRONT_MIN_CHECKOUT_TOTAL` - Minimum payable total (default: 1)
//! - `STOREFRONT_CURRENCY` - ISO 4217 currency code (default: INR)

use std::str::FromStr;
use std::time::Duration;

use macrocart_core::CurrencyCode;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API configuration
    pub api: BackendConfig,
    /// Cart pricing rules
    pub pricing: PricingConfig,
}

/// Backend REST API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Bearer token for authenticated endpoints
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
    /// Maximum number of cached products
    pub cache_capacity: u64,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

/// Cart pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Orders whose discounted subtotal reaches this amount ship free
    pub free_shipping_threshold: Decimal,
    /// Flat fee charged below the threshold
    pub shipping_fee: Decimal,
    /// Smallest total the payment gateway accepts
    pub min_checkout_total: Decimal,
    /// Currency all amounts are expressed in
    pub currency: CurrencyCode,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Decimal::from(999),
            shipping_fee: Decimal::from(99),
            min_checkout_total: Decimal::ONE,
            currency: CurrencyCode::INR,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api: BackendConfig::from_lookup(&lookup)?,
            pricing: PricingConfig::from_lookup(&lookup)?,
        })
    }
}

impl BackendConfig {
    /// Build a configuration for a base URL with default timeouts and caching.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("STOREFRONT_API_BASE_URL", base_url)?,
            api_token: None,
            timeout: Duration::from_secs(15),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 1000,
        })
    }

    /// Load backend configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or any value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = get_required(lookup, "STOREFRONT_API_BASE_URL")?;
        Ok(Self {
            base_url: parse_base_url("STOREFRONT_API_BASE_URL", &raw_url)?,
            api_token: lookup("STOREFRONT_API_TOKEN")
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            timeout: Duration::from_secs(parse_or_default(
                lookup,
                "STOREFRONT_HTTP_TIMEOUT_SECS",
                15,
            )?),
            cache_ttl: Duration::from_secs(parse_or_default(
                lookup,
                "STOREFRONT_CACHE_TTL_SECS",
                300,
            )?),
            cache_capacity: parse_or_default(lookup, "STOREFRONT_CACHE_CAPACITY", 1000)?,
        })
    }
}

impl PricingConfig {
    /// Load pricing rules from environment variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable or negative amounts.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&env_lookup)
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            free_shipping_threshold: get_money(
                lookup,
                "STOREFRONT_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
            shipping_fee: get_money(lookup, "STOREFRONT_SHIPPING_FEE", defaults.shipping_fee)?,
            min_checkout_total: get_money(
                lookup,
                "STOREFRONT_MIN_CHECKOUT_TOTAL",
                defaults.min_checkout_total,
            )?,
            currency: parse_or_default(lookup, "STOREFRONT_CURRENCY", defaults.currency)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a required variable.
fn get_required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse a variable, using `default` when it is unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a non-negative monetary amount.
fn get_money<F>(lookup: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let amount = parse_or_default(lookup, key, default)?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must not be negative (got {amount})"),
        ));
    }
    Ok(amount)
}

/// Parse a base URL, normalising it to end with exactly one slash so relative
/// joins append to the path instead of replacing its last segment.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let normalised = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&normalised)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
