//! Metaobject reference conversion functions.

use product_swipe_core::ShopifyGid;

use super::super::queries::get_metaobject::{Metaobject, ReferenceNode};

/// Product IDs extracted from a metaobject's product list field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencedIds {
    /// Number of referenced nodes, of any type.
    pub reference_count: usize,
    /// Valid product GIDs in field order.
    pub ids: Vec<String>,
    /// Product references whose ID is not a product GID.
    pub invalid: Vec<String>,
}

/// Collect the product GIDs a metaobject references.
///
/// Non-product references and empty IDs are dropped. IDs that do not parse
/// as `gid://shopify/Product/...` are reported in `invalid`.
pub fn referenced_product_ids(metaobject: Metaobject) -> ReferencedIds {
    let nodes = metaobject
        .products_list
        .and_then(|field| field.references)
        .map(|references| references.nodes)
        .unwrap_or_default();

    let mut result = ReferencedIds {
        reference_count: nodes.len(),
        ..ReferencedIds::default()
    };

    for node in nodes {
        let ReferenceNode::Product(product) = node else {
            continue;
        };
        if product.id.is_empty() {
            continue;
        }
        match ShopifyGid::parse(&product.id) {
            Ok(gid) if gid.is_product() => result.ids.push(gid.into_inner()),
            _ => result.invalid.push(product.id),
        }
    }

    result
}
