//! Product swipe landing page library.
//!
//! Serves a mobile, full-screen product carousel whose products are curated
//! in a Shopify metaobject. Exposed as a library so the router can be driven
//! from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;

use axum::{Router, handler::HandlerWithoutStateExt, http::Request};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Directory holding `css/` and `js/`, including the hashed `derived/` copies.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router with all middleware applied.
pub fn app(state: AppState) -> Router {
    // Templates only reference content-hashed assets
    let static_files = ServiceBuilder::new()
        .layer(axum::middleware::from_fn(middleware::static_cache_middleware))
        .service(
            ServeDir::new(STATIC_DIR)
                .not_found_service(routes::errors::not_found.into_service()),
        );

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .fallback(routes::errors::not_found)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}
