//! Integration tests for the product swipe landing page.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p product-swipe-integration-tests
//! ```
//!
//! Each test starts the real router on an ephemeral port, pointed at an
//! `httpmock` server standing in for the Shopify Storefront API. No network
//! access or Shopify credentials are needed.

use httpmock::MockServer;
use httpmock::prelude::*;
use product_swipe_storefront::config::StorefrontConfig;
use product_swipe_storefront::shopify::StorefrontClient;
use product_swipe_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// GraphQL path the mocked Shopify serves.
pub const SHOPIFY_PATH: &str = "/api/2025-04/graphql.json";

/// Environment for a fully configured landing page.
pub const DEFAULT_ENV: &[(&str, &str)] = &[
    ("SHOPIFY_STORE_DOMAIN", "test-store.myshopify.com"),
    ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "test-token"),
    ("LP_METAOBJECT_HANDLE", "spring-lp"),
    ("LP_CACHE_TTL_SECS", "0"),
];

/// A running storefront plus its mocked Shopify backend.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub shopify: MockServer,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Start with [`DEFAULT_ENV`].
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    /// Start with [`DEFAULT_ENV`] plus overrides. An empty value unsets a
    /// default.
    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let vars: Vec<(String, String)> = DEFAULT_ENV
            .iter()
            .chain(overrides)
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();

        let config = StorefrontConfig::from_lookup(&|key| {
            vars.iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .expect("test configuration should be valid");

        let shopify = MockServer::start_async().await;
        let state = match config.shopify.clone() {
            Some(shopify_config) => {
                let client =
                    StorefrontClient::with_endpoint(&shopify_config, shopify.url(SHOPIFY_PATH))
                        .expect("Failed to build Storefront client");
                AppState::with_storefront(config, client)
            }
            None => AppState::new(config).expect("Failed to build application state"),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        let app = product_swipe_storefront::app(state);
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("test server failed: {e}");
            }
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
            shopify,
            server,
        }
    }

    /// GET a path on the storefront.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("request to storefront failed")
    }

    /// Mock the metaobject query for `handle`, referencing `product_ids`.
    pub async fn mock_metaobject(&self, handle: &str, product_ids: &[&str]) -> httpmock::Mock<'_> {
        let handle_matcher = format!("\"handle\":\"{handle}\"");
        let nodes: Vec<Value> = product_ids
            .iter()
            .map(|id| json!({"__typename": "Product", "id": id, "handle": "ref"}))
            .collect();
        let body = json!({"data": {"metaobject": {
            "id": "gid://shopify/Metaobject/1",
            "handle": handle,
            "productsList": {"references": {"nodes": nodes}}
        }}});

        self.shopify
            .mock_async(|when, then| {
                when.method(POST)
                    .path(SHOPIFY_PATH)
                    .body_contains("GetMetaobject")
                    .body_contains(handle_matcher);
                then.status(200).json_body(body);
            })
            .await
    }

    /// Mock the product query, answering with `nodes`.
    pub async fn mock_products(&self, nodes: Vec<Value>) -> httpmock::Mock<'_> {
        self.shopify
            .mock_async(|when, then| {
                when.method(POST)
                    .path(SHOPIFY_PATH)
                    .body_contains("GetProductsByIds");
                then.status(200).json_body(json!({"data": {"nodes": nodes}}));
            })
            .await
    }

    /// Make every Shopify request fail with `status`.
    pub async fn mock_shopify_failure(&self, status: u16) -> httpmock::Mock<'_> {
        self.mock_shopify_failure_with_body(status, "upstream unavailable")
            .await
    }

    /// Make every Shopify request fail with `status` and a response `body`.
    pub async fn mock_shopify_failure_with_body(
        &self,
        status: u16,
        body: &str,
    ) -> httpmock::Mock<'_> {
        self.shopify
            .mock_async(|when, then| {
                when.method(POST).path(SHOPIFY_PATH);
                then.status(status).body(body);
            })
            .await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A Storefront API product node.
#[must_use]
pub fn product_node(id: &str, title: &str, amount: &str, image_count: usize) -> Value {
    let slug = title.to_lowercase().replace(' ', "-");
    let edges: Vec<Value> = (0..image_count)
        .map(|i| {
            json!({"node": {
                "url": format!("https://cdn.shopify.com/s/files/{slug}-{i}.jpg"),
                "altText": null
            }})
        })
        .collect();

    json!({
        "__typename": "Product",
        "id": id,
        "handle": slug,
        "title": title,
        "onlineStoreUrl": format!("https://shop.example.com/products/{slug}"),
        "images": {"edges": edges},
        "priceRange": {"minVariantPrice": {"amount": amount, "currencyCode": "JPY"}}
    })
}
