//! Domain types for the landing page.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response types in `storefront::queries`.

use product_swipe_core::Price;
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Format for display in the `ja-JP` currency style.
    ///
    /// Falls back to `"<amount> <code>"` when the amount or currency cannot
    /// be parsed.
    #[must_use]
    pub fn display(&self) -> String {
        Price::parse(&self.amount, &self.currency_code).map_or_else(
            |_| format!("{} {}", self.amount, self.currency_code),
            |price| price.to_string(),
        )
    }
}

// =============================================================================
// Slide Types
// =============================================================================

/// Product image shown in a slide's horizontal carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// One product in the vertical carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingSlide {
    /// Shopify product GID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Images in display order.
    pub images: Vec<SlideImage>,
    /// Lowest variant price.
    pub price: Money,
    /// `price` formatted for display.
    pub formatted_price: String,
    /// Product page on the online store, if published there.
    pub product_url: Option<String>,
}

impl LandingSlide {
    /// Alt text for an image, falling back to the product title.
    #[must_use]
    pub fn alt_for<'a>(&'a self, image: &'a SlideImage) -> &'a str {
        image
            .alt_text
            .as_deref()
            .filter(|alt| !alt.is_empty())
            .unwrap_or(&self.title)
    }
}
