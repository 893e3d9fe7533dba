//! Deployment check page.
//!
//! Lists which configuration variables are set, never their values.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::config::FallbackMode;
use crate::filters;
use crate::routes::errors::{EnvVarStatus, env_var_statuses};
use crate::state::AppState;

/// Diagnostics page template.
#[derive(Template, WebTemplate)]
#[template(path = "diagnostics.html")]
pub struct DiagnosticsTemplate {
    pub environment: Option<String>,
    pub shopify_configured: bool,
    pub fallback_mode: &'static str,
    pub env_vars: Vec<EnvVarStatus>,
}

/// Display the diagnostics page.
#[instrument(skip(state))]
pub async fn diagnostics(State(state): State<AppState>) -> DiagnosticsTemplate {
    let config = state.config();

    DiagnosticsTemplate {
        environment: config.sentry_environment.clone(),
        shopify_configured: state.storefront().is_ok(),
        fallback_mode: match config.fallback_mode {
            FallbackMode::Placeholder => "placeholder",
            FallbackMode::Error => "error",
        },
        env_vars: env_var_statuses(config),
    }
}
