//! Long-lived caching for content-hashed static assets.

use axum::{
    extract::Request,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware::Next,
    response::Response,
};

/// Policy for files under `/static`, whose URLs change with their content.
pub const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Mark successful static responses immutable.
///
/// Misses and errors are left alone so the security headers layer marks them
/// `no-store`.
pub async fn static_cache_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if response.status().is_success() {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL));
    }
    response
}
