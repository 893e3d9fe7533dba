//! Core types for the landing page.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gid;
pub mod price;

pub use gid::{GidError, ShopifyGid};
pub use price::{CurrencyCode, Price, PriceError};
