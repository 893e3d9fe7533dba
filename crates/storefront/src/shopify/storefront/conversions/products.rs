//! Product type conversion functions.

use crate::shopify::types::{LandingSlide, Money, SlideImage};

use super::super::queries::get_products_by_ids::{Node, Product};

/// Convert a `nodes(ids:)` result to slides, dropping nulls and non-products.
pub fn convert_product_nodes(nodes: Vec<Option<Node>>) -> Vec<LandingSlide> {
    nodes.into_iter().filter_map(convert_product_node).collect()
}

/// Convert one `nodes(ids:)` entry to a slide.
pub fn convert_product_node(node: Option<Node>) -> Option<LandingSlide> {
    match node? {
        Node::Product(product) => Some(convert_product(product)),
        Node::Other => None,
    }
}

fn convert_product(product: Product) -> LandingSlide {
    let price = Money {
        amount: product.price_range.min_variant_price.amount,
        currency_code: product.price_range.min_variant_price.currency_code,
    };
    let formatted_price = price.display();

    LandingSlide {
        id: product.id,
        handle: product.handle,
        title: product.title,
        images: product
            .images
            .edges
            .into_iter()
            .map(|edge| SlideImage {
                url: edge.node.url,
                alt_text: edge.node.alt_text,
            })
            .collect(),
        price,
        formatted_price,
        product_url: product.online_store_url.filter(|url| !url.is_empty()),
    }
}
