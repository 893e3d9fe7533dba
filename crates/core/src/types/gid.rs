//! Shopify global ID type.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopifyGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The input string is empty.
    #[error("gid cannot be empty")]
    Empty,
    /// The input does not start with `gid://shopify/`.
    #[error("gid must start with gid://shopify/")]
    MissingPrefix,
    /// The resource segment is missing.
    #[error("gid resource type cannot be empty")]
    EmptyResource,
    /// The ID segment is missing.
    #[error("gid id cannot be empty")]
    EmptyId,
}

/// A Shopify global ID, e.g. `gid://shopify/Product/8123456789`.
///
/// ## Examples
///
/// ```
/// use product_swipe_core::ShopifyGid;
///
/// let gid = ShopifyGid::parse("gid://shopify/Product/42").unwrap();
/// assert_eq!(gid.resource(), "Product");
/// assert_eq!(gid.id(), "42");
///
/// assert!(ShopifyGid::parse("").is_err());
/// assert!(ShopifyGid::parse("42").is_err());
/// assert!(ShopifyGid::parse("gid://shopify/Product/").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ShopifyGid {
    raw: String,
    resource_len: usize,
}

impl ShopifyGid {
    /// The prefix every Shopify GID starts with.
    pub const PREFIX: &'static str = "gid://shopify/";

    /// Parse a `ShopifyGid` from a string.
    ///
    /// Query parameters (`?...`) after the ID are kept in the raw value but
    /// are not part of [`ShopifyGid::id`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks the `gid://shopify/`
    /// prefix, or has an empty resource or ID segment.
    pub fn parse(s: &str) -> Result<Self, GidError> {
        if s.is_empty() {
            return Err(GidError::Empty);
        }

        let rest = s.strip_prefix(Self::PREFIX).ok_or(GidError::MissingPrefix)?;
        let (resource, id) = rest.split_once('/').ok_or(GidError::EmptyId)?;

        if resource.is_empty() {
            return Err(GidError::EmptyResource);
        }

        let id = id.split('?').next().unwrap_or_default();
        if id.is_empty() {
            return Err(GidError::EmptyId);
        }

        Ok(Self {
            raw: s.to_owned(),
            resource_len: resource.len(),
        })
    }

    /// Returns the resource type, e.g. `Product`.
    #[must_use]
    pub fn resource(&self) -> &str {
        let start = Self::PREFIX.len();
        self.raw
            .get(start..start + self.resource_len)
            .unwrap_or_default()
    }

    /// Returns the resource-local ID, e.g. `8123456789`.
    #[must_use]
    pub fn id(&self) -> &str {
        let start = Self::PREFIX.len() + self.resource_len + 1;
        self.raw
            .get(start..)
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default()
    }

    /// Whether this GID points at a product.
    #[must_use]
    pub fn is_product(&self) -> bool {
        self.resource() == "Product"
    }

    /// Returns the full GID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consumes the GID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.raw
    }
}

impl fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ShopifyGid {
    type Error = GidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ShopifyGid> for String {
    fn from(gid: ShopifyGid) -> Self {
        gid.raw
    }
}

impl AsRef<str> for ShopifyGid {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_gid() {
        let gid = ShopifyGid::parse("gid://shopify/Product/8123456789").unwrap();
        assert_eq!(gid.resource(), "Product");
        assert_eq!(gid.id(), "8123456789");
        assert!(gid.is_product());
        assert_eq!(gid.to_string(), "gid://shopify/Product/8123456789");
    }

    #[test]
    fn test_parse_non_product_gid() {
        let gid = ShopifyGid::parse("gid://shopify/Metaobject/77").unwrap();
        assert_eq!(gid.resource(), "Metaobject");
        assert!(!gid.is_product());
    }

    #[test]
    fn test_parse_gid_with_query() {
        let gid = ShopifyGid::parse("gid://shopify/ProductImage/9?v=2").unwrap();
        assert_eq!(gid.id(), "9");
        assert_eq!(gid.as_str(), "gid://shopify/ProductImage/9?v=2");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(ShopifyGid::parse(""), Err(GidError::Empty));
        assert_eq!(ShopifyGid::parse("dummy-id-1"), Err(GidError::MissingPrefix));
        assert_eq!(
            ShopifyGid::parse("gid://shopify//1"),
            Err(GidError::EmptyResource)
        );
        assert_eq!(
            ShopifyGid::parse("gid://shopify/Product"),
            Err(GidError::EmptyId)
        );
        assert_eq!(
            ShopifyGid::parse("gid://shopify/Product/"),
            Err(GidError::EmptyId)
        );
    }

    #[test]
    fn test_serde_roundtrip_rejects_invalid() {
        let gid: ShopifyGid = serde_json::from_str("\"gid://shopify/Product/1\"").unwrap();
        assert_eq!(serde_json::to_string(&gid).unwrap(), "\"gid://shopify/Product/1\"");

        let bad: Result<ShopifyGid, _> = serde_json::from_str("\"not-a-gid\"");
        assert!(bad.is_err());
    }
}
