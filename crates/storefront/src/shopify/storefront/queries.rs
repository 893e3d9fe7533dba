//! GraphQL query definitions for Shopify Storefront API.
//!
//! Each query is a unit struct implementing [`GraphQLQuery`] plus a module
//! of the same name holding its `Variables` and `ResponseData`, the same
//! shape `graphql_client`'s derive generates. The types are written by hand
//! and cover only the fields the queries select.

use graphql_client::{GraphQLQuery, QueryBody};

// =============================================================================
// GetMetaobject
// =============================================================================

/// Resolve a metaobject by handle and type to the products it references.
pub struct GetMetaobject;

pub mod get_metaobject {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetMetaobject";
    pub const QUERY: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/graphql/storefront/queries/metaobject.graphql"
    ));

    /// `MetaobjectHandleInput` from the Storefront schema.
    #[derive(Debug, Clone, Serialize)]
    pub struct MetaobjectHandleInput {
        pub handle: String,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: MetaobjectHandleInput,
        pub field_key: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub metaobject: Option<Metaobject>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Metaobject {
        pub id: String,
        pub handle: String,
        pub products_list: Option<MetaobjectField>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectField {
        pub references: Option<MetaobjectFieldReferences>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectFieldReferences {
        #[serde(default)]
        pub nodes: Vec<ReferenceNode>,
    }

    /// A referenced node; only `Product` carries fields.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum ReferenceNode {
        Product(ProductReference),
        #[serde(other)]
        Other,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductReference {
        #[serde(default)]
        pub id: String,
        #[serde(default)]
        pub handle: String,
    }
}

impl GraphQLQuery for GetMetaobject {
    type Variables = get_metaobject::Variables;
    type ResponseData = get_metaobject::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_metaobject::QUERY,
            operation_name: get_metaobject::OPERATION_NAME,
        }
    }
}

// =============================================================================
// GetProductsByIds
// =============================================================================

/// Load products by GID in a single `nodes(ids:)` request.
pub struct GetProductsByIds;

pub mod get_products_by_ids {
    use serde::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "GetProductsByIds";
    pub const QUERY: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/graphql/storefront/queries/products.graphql"
    ));

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub ids: Vec<String>,
        pub image_count: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        #[serde(default)]
        pub nodes: Vec<Option<Node>>,
    }

    /// A node from `nodes(ids:)`; IDs of other types come back without fields.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum Node {
        Product(Product),
        #[serde(other)]
        Other,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Product {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub online_store_url: Option<String>,
        pub images: ImageConnection,
        pub price_range: ProductPriceRange,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ImageConnection {
        #[serde(default)]
        pub edges: Vec<ImageEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ImageEdge {
        pub node: Image,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Image {
        pub url: String,
        pub alt_text: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductPriceRange {
        pub min_variant_price: MoneyV2,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }
}

impl GraphQLQuery for GetProductsByIds {
    type Variables = get_products_by_ids::Variables;
    type ResponseData = get_products_by_ids::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_products_by_ids::QUERY,
            operation_name: get_products_by_ids::OPERATION_NAME,
        }
    }
}
