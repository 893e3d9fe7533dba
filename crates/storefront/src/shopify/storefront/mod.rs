//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for the query envelope with `reqwest` 0.13 for HTTP.
//! Caches assembled slides using `moka` (5-minute TTL by default).

mod cache;
mod conversions;

pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::LandingSlide;
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{convert_product_nodes, referenced_product_ids};
use queries::{GetMetaobject, GetProductsByIds, get_metaobject, get_products_by_ids};

/// Header carrying the Storefront API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Longest response body excerpt kept in logs and errors.
const BODY_EXCERPT_CHARS: usize = 500;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Loads landing page slides from a metaobject's product references.
/// Assembled slides are cached per metaobject handle.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    metaobject_handle: String,
    metaobject_type: String,
    products_field_key: String,
    max_products: i64,
    max_images: i64,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl StorefrontClient {
    /// Create a new Storefront API client for the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        Self::with_endpoint(config, config.endpoint())
    }

    /// Create a client that talks to an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        config: &ShopifyStorefrontConfig,
        endpoint: impl Into<String>,
    ) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = config.cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(100)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: endpoint.into(),
                access_token: config.storefront_access_token.clone(),
                metaobject_handle: config.metaobject_handle.clone(),
                metaobject_type: config.metaobject_type.clone(),
                products_field_key: config.products_field_key.clone(),
                max_products: config.max_products,
                max_images: config.max_images,
                cache,
            }),
        })
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);
        let access_token = self.inner.access_token.expose_secret();

        debug!(
            endpoint = %self.inner.endpoint,
            query_name = request_body.operation_name,
            has_variables = serde_json::to_value(&request_body.variables)
                .is_ok_and(|v| v.as_object().is_some_and(|o| !o.is_empty())),
            has_token = !access_token.is_empty(),
            "Shopify API request"
        );

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            warn!(retry_after, "Shopify API rate limited the request");
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let body = excerpt(&response_text);
            error!(
                status = %status,
                endpoint = %self.inner.endpoint,
                body = %body,
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                error!(
                    error = %e,
                    body = %excerpt(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let errors: Vec<GraphQLError> = errors.into_iter().map(convert_graphql_error).collect();
            error!(
                status = %status,
                errors = ?errors,
                "Shopify API returned GraphQL errors"
            );
            return Err(ShopifyError::GraphQL(errors));
        }

        response.data.ok_or_else(|| {
            warn!(
                endpoint = %self.inner.endpoint,
                "Shopify API request succeeded but returned no data"
            );
            ShopifyError::NoData
        })
    }

    // =========================================================================
    // Landing Page Methods
    // =========================================================================

    /// Load the slides referenced by a landing page metaobject.
    ///
    /// Uses `handle` when given and non-empty, otherwise the configured
    /// default. A missing metaobject, an empty product list, or products that
    /// no longer exist yield an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::MissingMetaobjectHandle`] if no handle is
    /// available, [`ShopifyError::Metaobject`] if the metaobject request
    /// fails, and [`ShopifyError::Products`] if the product request fails.
    #[instrument(skip(self))]
    pub async fn fetch_landing_slides(
        &self,
        handle: Option<&str>,
    ) -> Result<Vec<LandingSlide>, ShopifyError> {
        let handle = handle
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(self.inner.metaobject_handle.as_str());

        if handle.is_empty() {
            error!("Metaobject handle is not defined");
            return Err(ShopifyError::MissingMetaobjectHandle);
        }

        let cache_key = CacheKey::Slides {
            handle: handle.to_string(),
        };

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Slides(slides)) = cache.get(&cache_key).await
        {
            debug!(handle, "Cache hit for landing slides");
            return Ok(slides.as_ref().clone());
        }

        info!(handle, "Fetching landing page slides");

        let product_ids = self.fetch_product_ids(handle).await.map_err(|e| {
            error!(error = %e, "Error fetching metaobject data");
            ShopifyError::Metaobject(Box::new(e))
        })?;

        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let slides = self.fetch_products(&product_ids).await.map_err(|e| {
            error!(error = %e, "Error fetching or processing product details");
            ShopifyError::Products(Box::new(e))
        })?;

        info!(count = slides.len(), "Processed products for landing page");

        if !slides.is_empty()
            && let Some(cache) = &self.inner.cache
        {
            cache
                .insert(cache_key, CacheValue::Slides(Arc::new(slides.clone())))
                .await;
        }

        Ok(slides)
    }

    /// Resolve a metaobject to the product GIDs it references.
    async fn fetch_product_ids(&self, handle: &str) -> Result<Vec<String>, ShopifyError> {
        let variables = get_metaobject::Variables {
            handle: get_metaobject::MetaobjectHandleInput {
                handle: handle.to_string(),
                kind: self.inner.metaobject_type.clone(),
            },
            field_key: self.inner.products_field_key.clone(),
            first: self.inner.max_products,
        };

        let metaobject = match self.execute::<GetMetaobject>(variables).await {
            Ok(data) => data.metaobject,
            Err(ShopifyError::NoData) => None,
            Err(e) => return Err(e),
        };

        let Some(metaobject) = metaobject else {
            warn!(
                handle,
                metaobject_type = %self.inner.metaobject_type,
                "Metaobject not found"
            );
            return Ok(Vec::new());
        };

        debug!(
            metaobject_id = %metaobject.id,
            metaobject_handle = %metaobject.handle,
            "Resolved metaobject"
        );
        let referenced = referenced_product_ids(metaobject);

        if referenced.reference_count == 0 {
            warn!(
                field_key = %self.inner.products_field_key,
                "No product references found in metaobject field"
            );
            return Ok(Vec::new());
        }

        for invalid in &referenced.invalid {
            warn!(id = %invalid, "Skipping metaobject reference that is not a product GID");
        }

        if referenced.ids.is_empty() {
            warn!("No valid product GIDs found in metaobject references");
            return Ok(Vec::new());
        }

        debug!(count = referenced.ids.len(), ids = ?referenced.ids, "Found product GIDs in metaobject");
        Ok(referenced.ids)
    }

    /// Load products by GID and convert them to slides, keeping GID order.
    async fn fetch_products(&self, ids: &[String]) -> Result<Vec<LandingSlide>, ShopifyError> {
        debug!(count = ids.len(), "Fetching product details by GID");

        let variables = get_products_by_ids::Variables {
            ids: ids.to_vec(),
            image_count: self.inner.max_images,
        };

        let nodes = match self.execute::<GetProductsByIds>(variables).await {
            Ok(data) => data.nodes,
            Err(ShopifyError::NoData) => Vec::new(),
            Err(e) => return Err(e),
        };

        if nodes.is_empty() {
            warn!("No product nodes returned when fetching by GID");
            return Ok(Vec::new());
        }

        let requested = nodes.len();
        let slides = convert_product_nodes(nodes);
        if slides.len() < requested {
            debug!(
                dropped = requested - slides.len(),
                "Dropped null or non-product nodes"
            );
        }

        Ok(slides)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate cached slides for a metaobject handle.
    pub async fn invalidate_slides(&self, handle: &str) {
        if let Some(cache) = &self.inner.cache {
            cache
                .invalidate(&CacheKey::Slides {
                    handle: handle.to_string(),
                })
                .await;
        }
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }
}

/// Convert a `graphql_client` error, keeping `extensions.code`.
fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    let code = e
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .and_then(serde_json::Value::as_str)
        .map(String::from);

    GraphQLError {
        message: e.message,
        locations: e.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: e.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
        code,
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const PATH: &str = "/api/2025-04/graphql.json";

    fn config(cache_ttl: Option<Duration>) -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store_domain: "test-store.myshopify.com".to_string(),
            storefront_access_token: SecretString::from("test-token"),
            api_version: "2025-04".to_string(),
            metaobject_handle: "spring-lp".to_string(),
            metaobject_type: "lp_swipe_content".to_string(),
            products_field_key: "products_list".to_string(),
            max_products: 20,
            max_images: 10,
            request_timeout: Duration::from_secs(5),
            cache_ttl,
        }
    }

    fn client(server: &MockServer, cache_ttl: Option<Duration>) -> StorefrontClient {
        StorefrontClient::with_endpoint(&config(cache_ttl), server.url(PATH)).unwrap()
    }

    fn metaobject_body(ids: &[&str]) -> serde_json::Value {
        let nodes: Vec<_> = ids
            .iter()
            .map(|id| json!({"__typename": "Product", "id": id, "handle": "h"}))
            .collect();
        json!({"data": {"metaobject": {
            "id": "gid://shopify/Metaobject/1",
            "handle": "spring-lp",
            "productsList": {"references": {"nodes": nodes}}
        }}})
    }

    fn product(id: &str, title: &str) -> serde_json::Value {
        json!({
            "__typename": "Product",
            "id": id,
            "handle": title.to_lowercase(),
            "title": title,
            "onlineStoreUrl": format!("https://shop.example.com/products/{}", title.to_lowercase()),
            "images": {"edges": [{"node": {"url": "https://cdn.shopify.com/a.jpg", "altText": null}}]},
            "priceRange": {"minVariantPrice": {"amount": "1000.0", "currencyCode": "JPY"}}
        })
    }

    #[test]
    fn test_new_uses_https_endpoint() {
        let client = StorefrontClient::new(&config(None)).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://test-store.myshopify.com/api/2025-04/graphql.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_landing_slides() {
        let server = MockServer::start_async().await;
        let metaobject = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .header(ACCESS_TOKEN_HEADER, "test-token")
                    .body_contains("GetMetaobject")
                    .body_contains("spring-lp");
                then.status(200)
                    .json_body(metaobject_body(&["gid://shopify/Product/2", "gid://shopify/Product/1"]));
            })
            .await;
        let products = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetProductsByIds");
                then.status(200).json_body(json!({"data": {"nodes": [
                    product("gid://shopify/Product/2", "Second"),
                    null,
                    product("gid://shopify/Product/1", "First"),
                ]}}));
            })
            .await;

        let slides = client(&server, None).fetch_landing_slides(None).await.unwrap();

        metaobject.assert_async().await;
        products.assert_async().await;
        let titles: Vec<_> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_eq!(slides[0].formatted_price, "￥1,000");
    }

    #[tokio::test]
    async fn test_explicit_handle_overrides_default() {
        let server = MockServer::start_async().await;
        let metaobject = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("summer-sale");
                then.status(200).json_body(json!({"data": {"metaobject": null}}));
            })
            .await;

        let slides = client(&server, None)
            .fetch_landing_slides(Some("summer-sale"))
            .await
            .unwrap();

        metaobject.assert_async().await;
        assert!(slides.is_empty());
    }

    #[tokio::test]
    async fn test_missing_handle() {
        let server = MockServer::start_async().await;
        let mut config = config(None);
        config.metaobject_handle = String::new();
        let client = StorefrontClient::with_endpoint(&config, server.url(PATH)).unwrap();

        let err = client.fetch_landing_slides(Some("  ")).await.unwrap_err();
        assert!(matches!(err, ShopifyError::MissingMetaobjectHandle));
    }

    #[tokio::test]
    async fn test_empty_references_skip_product_request() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetMetaobject");
                then.status(200).json_body(metaobject_body(&[]));
            })
            .await;
        let products = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetProductsByIds");
                then.status(200).json_body(json!({"data": {"nodes": []}}));
            })
            .await;

        let slides = client(&server, None).fetch_landing_slides(None).await.unwrap();

        assert!(slides.is_empty());
        products.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_graphql_errors_wrap_as_metaobject_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({
                    "errors": [{
                        "message": "Access denied",
                        "extensions": {"code": "ACCESS_DENIED"}
                    }]
                }));
            })
            .await;

        let err = client(&server, None).fetch_landing_slides(None).await.unwrap_err();

        assert_eq!(err.kind(), "metaobject");
        assert!(matches!(err.root(), ShopifyError::GraphQL(errors) if errors[0].code.as_deref() == Some("ACCESS_DENIED")));
        assert!(err.to_string().contains("Access denied (code: ACCESS_DENIED)"));
    }

    #[tokio::test]
    async fn test_product_request_failure_wraps_as_products_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetMetaobject");
                then.status(200)
                    .json_body(metaobject_body(&["gid://shopify/Product/1"]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetProductsByIds");
                then.status(500).body("upstream exploded");
            })
            .await;

        let err = client(&server, None).fetch_landing_slides(None).await.unwrap_err();

        assert_eq!(err.kind(), "products");
        assert!(matches!(err.root(), ShopifyError::Http { status: 500, body } if body == "upstream exploded"));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(429).header("Retry-After", "7");
            })
            .await;

        let err = client(&server, None).fetch_landing_slides(None).await.unwrap_err();
        assert!(matches!(err.root(), ShopifyError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client(&server, None).fetch_landing_slides(None).await.unwrap_err();
        assert!(matches!(err.root(), ShopifyError::Parse(_)));
    }

    #[tokio::test]
    async fn test_no_data_is_treated_as_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({"data": null}));
            })
            .await;

        let slides = client(&server, None).fetch_landing_slides(None).await.unwrap();
        assert!(slides.is_empty());
    }

    #[tokio::test]
    async fn test_slides_are_cached_per_handle() {
        let server = MockServer::start_async().await;
        let metaobject = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetMetaobject");
                then.status(200)
                    .json_body(metaobject_body(&["gid://shopify/Product/1"]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetProductsByIds");
                then.status(200)
                    .json_body(json!({"data": {"nodes": [product("gid://shopify/Product/1", "Only")]}}));
            })
            .await;

        let client = client(&server, Some(Duration::from_secs(60)));
        let first = client.fetch_landing_slides(None).await.unwrap();
        let second = client.fetch_landing_slides(Some("spring-lp")).await.unwrap();
        assert_eq!(first, second);
        metaobject.assert_hits_async(1).await;

        client.invalidate_slides("spring-lp").await;
        client.fetch_landing_slides(None).await.unwrap();
        metaobject.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_every_handle() {
        let server = MockServer::start_async().await;
        let spring = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .body_contains("GetMetaobject")
                    .body_contains("\"handle\":\"spring-lp\"");
                then.status(200)
                    .json_body(metaobject_body(&["gid://shopify/Product/1"]));
            })
            .await;
        let summer = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .body_contains("GetMetaobject")
                    .body_contains("\"handle\":\"summer-sale\"");
                then.status(200)
                    .json_body(metaobject_body(&["gid://shopify/Product/1"]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).body_contains("GetProductsByIds");
                then.status(200)
                    .json_body(json!({"data": {"nodes": [product("gid://shopify/Product/1", "Only")]}}));
            })
            .await;

        let client = client(&server, Some(Duration::from_secs(60)));
        client.fetch_landing_slides(None).await.unwrap();
        client.fetch_landing_slides(Some("summer-sale")).await.unwrap();
        client.fetch_landing_slides(Some("summer-sale")).await.unwrap();
        spring.assert_hits_async(1).await;
        summer.assert_hits_async(1).await;

        client.invalidate_all().await;
        client.fetch_landing_slides(None).await.unwrap();
        client.fetch_landing_slides(Some("summer-sale")).await.unwrap();
        spring.assert_hits_async(2).await;
        summer.assert_hits_async(2).await;
    }
}
