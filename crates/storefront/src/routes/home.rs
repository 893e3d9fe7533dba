//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::config::FallbackMode;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::routes::errors::DebugInfo;
use crate::shopify::types::{LandingSlide, Money, SlideImage};
use crate::state::AppState;

// =============================================================================
// Slide and Image Views
// =============================================================================

/// Slide display data for templates.
#[derive(Clone, Debug)]
pub struct SlideView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub images: Vec<ImageView>,
    pub product_url: Option<String>,
}

/// Image display data for templates.
#[derive(Clone, Debug)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    /// Only the first image of a slide loads eagerly.
    pub eager: bool,
}

impl From<&LandingSlide> for SlideView {
    fn from(slide: &LandingSlide) -> Self {
        let images = slide
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| ImageView {
                url: image.url.clone(),
                alt: slide.alt_for(image).to_string(),
                eager: i == 0,
            })
            .collect();

        Self {
            id: slide.id.clone(),
            title: slide.title.clone(),
            price: slide.formatted_price.clone(),
            images,
            product_url: slide.product_url.clone(),
        }
    }
}

// =============================================================================
// Placeholder Data
// =============================================================================

const PLACEHOLDER_IMAGE_URL: &str =
    "https://cdn.shopify.com/s/files/1/0000/0000/products/placeholder.png";

/// Dummy products shown when slides cannot be loaded.
#[must_use]
pub fn placeholder_slides() -> Vec<LandingSlide> {
    [(1, "1000"), (2, "2000")]
        .into_iter()
        .map(|(n, amount)| {
            let price = Money {
                amount: amount.to_string(),
                currency_code: "JPY".to_string(),
            };
            LandingSlide {
                id: format!("dummy-id-{n}"),
                handle: format!("dummy-product-{n}"),
                title: format!("テスト商品 {n}"),
                images: (1..=2)
                    .map(|i| SlideImage {
                        url: PLACEHOLDER_IMAGE_URL.to_string(),
                        alt_text: Some(format!("テスト画像 {i}")),
                    })
                    .collect(),
                formatted_price: price.display(),
                price,
                product_url: Some(format!("https://example.com/product-{n}")),
            }
        })
        .collect()
}

// =============================================================================
// Handler
// =============================================================================

/// Query parameters for the landing page.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Metaobject handle overriding the configured default.
    pub handle: Option<String>,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Slides in display order.
    pub slides: Vec<SlideView>,
    /// Whether the slides are placeholders.
    pub placeholder: bool,
}

impl HomeTemplate {
    #[must_use]
    pub fn new(slides: &[LandingSlide], placeholder: bool) -> Self {
        Self {
            slides: slides.iter().map(SlideView::from).collect(),
            placeholder,
        }
    }
}

/// Display the landing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<HomeQuery>) -> Response {
    let handle = query.handle.as_deref();
    add_breadcrumb(
        "navigation",
        "Viewed landing page",
        Some(&[("handle", handle.unwrap_or("(default)"))][..]),
    );

    let result = match state.storefront() {
        Ok(client) => client.fetch_landing_slides(handle).await,
        Err(e) => Err(e),
    };

    let error = match result {
        Ok(slides) => return HomeTemplate::new(&slides, false).into_response(),
        Err(e) => e,
    };

    let config = state.config();
    match config.fallback_mode {
        FallbackMode::Placeholder => {
            let event_id = sentry::capture_error(&error);
            tracing::error!(
                error = %error,
                kind = error.kind(),
                sentry_event_id = %event_id,
                "Failed to load landing page slides, rendering placeholders"
            );
            HomeTemplate::new(&placeholder_slides(), true).into_response()
        }
        FallbackMode::Error => {
            let debug = config.debug.then(|| DebugInfo::new(config, Some(&error)));
            AppError::Shopify(error).into_page(debug)
        }
    }
}
