//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Uses the `graphql_client` request/response envelope for typed queries
//! - Shopify is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for assembled slides (5 minute TTL)
//!
//! # Landing page data
//!
//! The landing page's products are curated in a metaobject (type
//! `lp_swipe_content`) whose `products_list` field references products.
//! Loading slides takes two sequential requests: the metaobject for the
//! product IDs, then the products themselves via `nodes(ids:)`.
//!
//! # Example
//!
//! ```rust,ignore
//! use product_swipe_storefront::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//!
//! // Slides for the configured metaobject handle
//! let slides = client.fetch_landing_slides(None).await?;
//!
//! // Slides for a specific campaign
//! let slides = client.fetch_landing_slides(Some("summer-sale")).await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Shopify API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed before a response arrived (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// Shopify answered with a non-success status code.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request succeeded but the response carried neither data nor errors.
    #[error("No data in response")]
    NoData,

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Required configuration is missing, so no request was made.
    #[error("Shopify API configuration error: missing {0}")]
    NotConfigured(String),

    /// Neither the request nor the configuration named a metaobject handle.
    #[error("Metaobject handle is missing")]
    MissingMetaobjectHandle,

    /// Resolving the metaobject's product references failed.
    #[error("Failed to fetch metaobject data from Shopify: {0}")]
    Metaobject(#[source] Box<ShopifyError>),

    /// Loading the referenced products failed.
    #[error("Failed to fetch or process product details from Shopify: {0}")]
    Products(#[source] Box<ShopifyError>),
}

impl ShopifyError {
    /// Short, stable label for logs and debug output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Http { .. } => "http",
            Self::GraphQL(_) => "graphql",
            Self::Parse(_) => "parse",
            Self::NoData => "no_data",
            Self::RateLimited(_) => "rate_limited",
            Self::NotConfigured(_) => "not_configured",
            Self::MissingMetaobjectHandle => "missing_metaobject_handle",
            Self::Metaobject(_) => "metaobject",
            Self::Products(_) => "products",
        }
    }

    /// Message safe to show to visitors.
    ///
    /// Stage wrappers name only the failed stage, never the inner error.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Metaobject(_) => "Failed to fetch metaobject data from Shopify.".to_string(),
            Self::Products(_) => {
                "Failed to fetch or process product details from Shopify.".to_string()
            }
            Self::NotConfigured(_) | Self::MissingMetaobjectHandle => self.to_string(),
            _ => "External service error".to_string(),
        }
    }

    /// The innermost error, unwrapping the metaobject/products stage wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Metaobject(inner) | Self::Products(inner) => inner.root(),
            other => other,
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
    /// `extensions.code`, e.g. `THROTTLED` or `ACCESS_DENIED`.
    pub code: Option<String>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if let Some(code) = &e.code {
                parts.push(format!("(code: {code})"));
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
