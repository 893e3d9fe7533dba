//! End-to-end tests for the landing page against a mocked Storefront API.

#![allow(clippy::unwrap_used)]

use product_swipe_integration_tests::{TestContext, product_node};
use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_SECURITY_POLICY};

const FIRST: &str = "gid://shopify/Product/101";
const SECOND: &str = "gid://shopify/Product/102";

// ============================================================================
// Landing Page
// ============================================================================

#[tokio::test]
async fn test_renders_slides_in_metaobject_order() {
    let ctx = TestContext::new().await;
    let metaobject = ctx.mock_metaobject("spring-lp", &[SECOND, FIRST]).await;
    let products = ctx
        .mock_products(vec![
            product_node(SECOND, "Linen Shirt", "5980.0", 3),
            product_node(FIRST, "Canvas Tote", "1200.0", 1),
        ])
        .await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();

    metaobject.assert_async().await;
    products.assert_async().await;

    let shirt = body.find("Linen Shirt").unwrap();
    let tote = body.find("Canvas Tote").unwrap();
    assert!(shirt < tote);
    assert!(body.contains("￥5,980"));
    assert!(body.contains("￥1,200"));
    assert!(body.contains("1 / 3"));
    assert!(body.contains("https://shop.example.com/products/linen-shirt"));
    assert!(!body.contains("data-placeholder"));
}

#[tokio::test]
async fn test_handle_query_parameter_selects_metaobject() {
    let ctx = TestContext::new().await;
    let metaobject = ctx.mock_metaobject("summer-sale", &[FIRST]).await;
    ctx.mock_products(vec![product_node(FIRST, "Straw Hat", "3000", 2)])
        .await;

    let body = ctx.get("/?handle=summer-sale").await.text().await.unwrap();

    metaobject.assert_async().await;
    assert!(body.contains("Straw Hat"));
}

#[tokio::test]
async fn test_empty_metaobject_shows_empty_state() {
    let ctx = TestContext::new().await;
    ctx.mock_metaobject("spring-lp", &[]).await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("No products found."));
}

#[tokio::test]
async fn test_null_product_nodes_are_skipped() {
    let ctx = TestContext::new().await;
    ctx.mock_metaobject("spring-lp", &[FIRST, SECOND]).await;
    ctx.mock_products(vec![
        serde_json::Value::Null,
        product_node(SECOND, "Wool Scarf", "4500", 1),
    ])
    .await;

    let body = ctx.get("/").await.text().await.unwrap();
    assert!(body.contains("Wool Scarf"));
    assert_eq!(body.matches("data-slide ").count(), 1);
}

// ============================================================================
// Fallback Behaviour
// ============================================================================

#[tokio::test]
async fn test_shopify_failure_renders_placeholders() {
    let ctx = TestContext::new().await;
    ctx.mock_shopify_failure(500).await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("data-placeholder"));
    assert!(body.contains("テスト商品 1"));
    assert!(body.contains("テスト商品 2"));
    assert!(body.contains("https://example.com/product-1"));
}

#[tokio::test]
async fn test_error_mode_renders_error_page() {
    let ctx = TestContext::with_env(&[("LP_FALLBACK_MODE", "error")]).await;
    ctx.mock_shopify_failure_with_body(500, "INTERNAL-TRACE db=10.0.0.5 shop_secret_ref=abc")
        .await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("エラーが発生しました: 502"));
    assert!(body.contains("Failed to fetch metaobject data from Shopify."));
    assert!(body.contains("再読み込み"));
    assert!(!body.contains("data-debug-info"));
    assert!(!body.contains("INTERNAL-TRACE"));
    assert!(!body.contains("HTTP 500"));
}

#[tokio::test]
async fn test_error_mode_with_debug_info() {
    let ctx = TestContext::with_env(&[("LP_FALLBACK_MODE", "error"), ("LP_DEBUG", "true")]).await;
    ctx.mock_shopify_failure(429).await;

    let body = ctx.get("/").await.text().await.unwrap();
    assert!(body.contains("data-debug-info"));
    assert!(body.contains("metaobject/rate_limited"));
    assert!(body.contains("detail: Rate limited"));
    assert!(body.contains("SHOPIFY_STOREFRONT_ACCESS_TOKEN: true"));
    assert!(!body.contains("test-token"));
}

#[tokio::test]
async fn test_unconfigured_shopify_falls_back() {
    let ctx = TestContext::with_env(&[("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "")]).await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("テスト商品 1"));

    let resp = ctx.get("/health/ready").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unconfigured_shopify_error_mode_names_missing_vars() {
    let ctx = TestContext::with_env(&[
        ("SHOPIFY_STORE_DOMAIN", ""),
        ("LP_FALLBACK_MODE", "error"),
    ])
    .await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Shopify API configuration error: missing SHOPIFY_STORE_DOMAIN")
    );
}

// ============================================================================
// Other Routes
// ============================================================================

#[tokio::test]
async fn test_unknown_route_returns_404_page() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/does-not-exist").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("エラーが発生しました: 404"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx.get("/health/ready").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_diagnostics_reports_presence_only() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/diagnostics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("SHOPIFY_STORE_DOMAIN: true"));
    assert!(body.contains("SHOPIFY_API_VERSION: false"));
    assert!(body.contains("shopifyConfigured: true"));
    assert!(!body.contains("test-store.myshopify.com"));
    assert!(!body.contains("test-token"));
}

#[tokio::test]
async fn test_response_headers() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/health").await;
    let headers = resp.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers[CACHE_CONTROL], "no-store, max-age=0");
    assert!(
        headers[CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .contains("https://cdn.shopify.com")
    );
}

#[tokio::test]
async fn test_missing_static_asset_is_not_cached() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/static/css/derived/main.deadbeef.css").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()[CACHE_CONTROL], "no-store, max-age=0");
    assert!(resp.text().await.unwrap().contains("エラーが発生しました: 404"));
}

#[tokio::test]
async fn test_static_assets_are_immutable() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/static/js/swipe.js").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );
}
