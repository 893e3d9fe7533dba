//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Shopify (required for live data)
//! - `SHOPIFY_STORE_DOMAIN` - Store domain (e.g., your-store.myshopify.com); a
//!   leading `https://` is stripped
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token
//!
//! When either is missing the server still starts. Every slide fetch then
//! fails with a configuration error and the page falls back.
//!
//! ## Optional
//! - `LP_HOST` - Bind address (default: 127.0.0.1)
//! - `LP_PORT` - Listen port (default: 3000)
//! - `LP_FALLBACK_MODE` - `placeholder` (default) or `error`
//! - `LP_DEBUG` - Show debug details on the fallback error page (default: false)
//! - `LP_METAOBJECT_HANDLE` - Default metaobject handle
//! - `LP_METAOBJECT_TYPE` - Metaobject type (default: `lp_swipe_content`)
//! - `LP_PRODUCTS_FIELD_KEY` - Product list field key (default: `products_list`)
//! - `LP_MAX_PRODUCTS` - Products per page (default: 20)
//! - `LP_MAX_IMAGES` - Images per product (default: 10)
//! - `LP_CACHE_TTL_SECS` - Slide cache TTL, 0 disables (default: 300)
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-04)
//! - `SHOPIFY_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Environment variables the diagnostics page reports on.
pub const REPORTED_ENV_VARS: &[&str] = &[
    "SHOPIFY_STORE_DOMAIN",
    "SHOPIFY_STOREFRONT_ACCESS_TOKEN",
    "SHOPIFY_API_VERSION",
    "LP_METAOBJECT_HANDLE",
];

const DEFAULT_API_VERSION: &str = "2025-04";
const DEFAULT_METAOBJECT_TYPE: &str = "lp_swipe_content";
const DEFAULT_PRODUCTS_FIELD_KEY: &str = "products_list";

/// Largest `first:` page size the Storefront API accepts.
const MAX_CONNECTION_PAGE: i64 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// What the landing page shows when slides cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackMode {
    /// Render placeholder products.
    #[default]
    Placeholder,
    /// Render the error page.
    Error,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "error" => Ok(Self::Error),
            other => Err(format!("expected 'placeholder' or 'error', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Behaviour when slides cannot be loaded
    pub fallback_mode: FallbackMode,
    /// Show debug details on the error page
    pub debug: bool,
    /// Shopify Storefront API configuration, if complete
    pub shopify: Option<ShopifyStorefrontConfig>,
    /// Required Shopify variables that were missing at startup
    pub missing_shopify_vars: Vec<String>,
    /// Names from [`REPORTED_ENV_VARS`] that were set at startup
    pub present_env_vars: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain without scheme (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Storefront API access token
    pub storefront_access_token: SecretString,
    /// Shopify API version (e.g., 2025-04)
    pub api_version: String,
    /// Metaobject handle used when a request does not name one
    pub metaobject_handle: String,
    /// Metaobject type of the landing page content
    pub metaobject_type: String,
    /// Metaobject field key holding the product references
    pub products_field_key: String,
    /// Maximum number of referenced products to load
    pub max_products: i64,
    /// Maximum number of images per product
    pub max_images: i64,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Slide cache time-to-live; `None` disables caching
    pub cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store_domain", &self.store_domain)
            .field("storefront_access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("metaobject_handle", &self.metaobject_handle)
            .field("metaobject_type", &self.metaobject_type)
            .field("products_field_key", &self.products_field_key)
            .field("max_products", &self.max_products)
            .field("max_images", &self.max_images)
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

/// Source of environment values, so loading can be tested without mutating
/// the process environment.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid. Missing
    /// Shopify variables are recorded in `missing_shopify_vars` instead.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let host = parse_env(lookup, "LP_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env(lookup, "LP_PORT", 3000_u16)?;
        let fallback_mode = parse_env(lookup, "LP_FALLBACK_MODE", FallbackMode::default())?;
        let debug = get_bool(lookup, "LP_DEBUG")?;

        let (shopify, missing_shopify_vars) = match ShopifyStorefrontConfig::from_lookup(lookup) {
            Ok(shopify) => (Some(shopify), Vec::new()),
            Err(ConfigError::MissingEnvVars(missing)) => (None, missing),
            Err(e) => return Err(e),
        };

        let present_env_vars = REPORTED_ENV_VARS
            .iter()
            .filter(|key| get_optional_env(lookup, key).is_some())
            .map(|key| (*key).to_string())
            .collect();

        Ok(Self {
            host,
            port,
            fallback_mode,
            debug,
            shopify,
            missing_shopify_vars,
            present_env_vars,
            sentry_dsn: get_optional_env(lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(lookup, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env(lookup, "SENTRY_SAMPLE_RATE", 1.0_f32)?,
            sentry_traces_sample_rate: parse_env(lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether a reported variable was set at startup.
    #[must_use]
    pub fn has_env_var(&self, key: &str) -> bool {
        self.present_env_vars.iter().any(|k| k == key)
    }
}

impl ShopifyStorefrontConfig {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let store_domain = get_optional_env(lookup, "SHOPIFY_STORE_DOMAIN")
            .map(|raw| normalize_store_domain(&raw))
            .filter(|domain| !domain.is_empty());
        let token = get_optional_env(lookup, "SHOPIFY_STOREFRONT_ACCESS_TOKEN");

        let mut missing = Vec::new();
        if store_domain.is_none() {
            missing.push("SHOPIFY_STORE_DOMAIN".to_string());
        }
        if token.is_none() {
            missing.push("SHOPIFY_STOREFRONT_ACCESS_TOKEN".to_string());
        }
        let (Some(store_domain), Some(token)) = (store_domain, token) else {
            return Err(ConfigError::MissingEnvVars(missing));
        };

        let cache_ttl_secs = parse_env(lookup, "LP_CACHE_TTL_SECS", 300_u64)?;

        Ok(Self {
            store_domain,
            storefront_access_token: SecretString::from(token),
            api_version: get_env_or_default(lookup, "SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            metaobject_handle: get_env_or_default(lookup, "LP_METAOBJECT_HANDLE", ""),
            metaobject_type: get_env_or_default(
                lookup,
                "LP_METAOBJECT_TYPE",
                DEFAULT_METAOBJECT_TYPE,
            ),
            products_field_key: get_env_or_default(
                lookup,
                "LP_PRODUCTS_FIELD_KEY",
                DEFAULT_PRODUCTS_FIELD_KEY,
            ),
            max_products: parse_page_size(lookup, "LP_MAX_PRODUCTS", 20)?,
            max_images: parse_page_size(lookup, "LP_MAX_IMAGES", 10)?,
            request_timeout: Duration::from_secs(parse_positive(lookup, "SHOPIFY_TIMEOUT_SECS", 15)?),
            cache_ttl: (cache_ttl_secs > 0).then(|| Duration::from_secs(cache_ttl_secs)),
        })
    }

    /// GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable; empty values count as unset.
fn get_optional_env(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(lookup: Lookup<'_>, key: &str, default: &str) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, using `default` when unset.
fn parse_env<T>(lookup: Lookup<'_>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(lookup, key).map_or(Ok(default), |value| {
        value
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a number that must be at least 1.
fn parse_positive(lookup: Lookup<'_>, key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = parse_env(lookup, key, default)?;
    if value < 1 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be at least 1 (got {value})"),
        ));
    }
    Ok(value)
}

/// Parse a connection page size, between 1 and [`MAX_CONNECTION_PAGE`].
fn parse_page_size(lookup: Lookup<'_>, key: &str, default: i64) -> Result<i64, ConfigError> {
    let value = parse_env(lookup, key, default)?;
    if !(1..=MAX_CONNECTION_PAGE).contains(&value) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 1 and {MAX_CONNECTION_PAGE} (got {value})"),
        ));
    }
    Ok(value)
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`), defaulting to false.
fn get_bool(lookup: Lookup<'_>, key: &str) -> Result<bool, ConfigError> {
    let Some(value) = get_optional_env(lookup, key) else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Strip a scheme and trailing slash from a store domain.
fn normalize_store_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains("://")
        && let Ok(url) = Url::parse(trimmed)
        && let Some(host) = url.host_str()
    {
        return url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
    }
    trimmed
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}
