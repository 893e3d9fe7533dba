//! Cache types for Storefront API responses.

use std::sync::Arc;

use crate::shopify::types::LandingSlide;

/// Cache key for assembled landing page data.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Slides for a metaobject handle.
    Slides { handle: String },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Slides(Arc<Vec<LandingSlide>>),
}
