//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page (?handle=<metaobject handle>)
//! GET  /diagnostics            - Configuration presence check
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (Shopify configured)
//! GET  /static/*               - Static assets
//! *                            - 404 error page
//! ```

pub mod diagnostics;
pub mod errors;
pub mod health;
pub mod home;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all page and health routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/diagnostics", get(diagnostics::diagnostics))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
