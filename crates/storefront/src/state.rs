//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::shopify::{ShopifyError, StorefrontClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the Shopify client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: Option<StorefrontClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Storefront client is only built when the Shopify configuration
    /// is complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ShopifyError> {
        let storefront = config
            .shopify
            .as_ref()
            .map(StorefrontClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, storefront }),
        })
    }

    /// Create state around an already-built client.
    #[must_use]
    pub fn with_storefront(config: StorefrontConfig, storefront: StorefrontClient) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront: Some(storefront),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotConfigured`] naming the missing variables
    /// when the client could not be built at startup.
    pub fn storefront(&self) -> Result<&StorefrontClient, ShopifyError> {
        self.inner.storefront.as_ref().ok_or_else(|| {
            ShopifyError::NotConfigured(self.inner.config.missing_shopify_vars.join(", "))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> StorefrontConfig {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(&|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[test]
    fn test_unconfigured_state_reports_missing_vars() {
        let state = AppState::new(config(&[])).unwrap();
        let err = state.storefront().err().unwrap();
        assert_eq!(
            err.to_string(),
            "Shopify API configuration error: missing SHOPIFY_STORE_DOMAIN, SHOPIFY_STOREFRONT_ACCESS_TOKEN"
        );
    }

    #[test]
    fn test_configured_state_builds_client() {
        let state = AppState::new(config(&[
            ("SHOPIFY_STORE_DOMAIN", "test-store.myshopify.com"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "token"),
        ]))
        .unwrap();
        assert_eq!(
            state.storefront().unwrap().endpoint(),
            "https://test-store.myshopify.com/api/2025-04/graphql.json"
        );
    }
}
