//! Error page and 404 fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::http::{StatusCode, Uri};

use crate::config::{REPORTED_ENV_VARS, StorefrontConfig};
use crate::error::AppError;
use crate::filters;
use crate::shopify::ShopifyError;

/// Presence of one reported environment variable.
#[derive(Clone, Debug)]
pub struct EnvVarStatus {
    pub name: String,
    pub present: bool,
}

/// Presence flags for every reported variable, never their values.
#[must_use]
pub fn env_var_statuses(config: &StorefrontConfig) -> Vec<EnvVarStatus> {
    REPORTED_ENV_VARS
        .iter()
        .map(|name| EnvVarStatus {
            name: (*name).to_string(),
            present: config.has_env_var(name),
        })
        .collect()
}

/// Details shown on the error page when `LP_DEBUG` is enabled.
#[derive(Clone, Debug)]
pub struct DebugInfo {
    pub timestamp: String,
    pub error_kind: Option<String>,
    pub detail: Option<String>,
    pub environment: Option<String>,
    pub env_vars: Vec<EnvVarStatus>,
}

impl DebugInfo {
    #[must_use]
    pub fn new(config: &StorefrontConfig, error: Option<&ShopifyError>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            error_kind: error.map(|e| {
                let root = e.root();
                if std::ptr::eq(root, e) {
                    e.kind().to_string()
                } else {
                    format!("{}/{}", e.kind(), root.kind())
                }
            }),
            detail: error.map(|e| e.root().to_string()),
            environment: config.sentry_environment.clone(),
            env_vars: env_var_statuses(config),
        }
    }
}

/// Generic error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
    pub debug: Option<DebugInfo>,
}

impl ErrorTemplate {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            debug: None,
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: DebugInfo) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Fallback handler for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
