//! Type conversion functions for Shopify Storefront API responses.

pub mod metaobjects;
pub mod products;

pub use metaobjects::referenced_product_ids;
pub use products::convert_product_nodes;
