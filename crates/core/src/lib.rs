//! Product Swipe Core - Shared types library.
//!
//! This crate provides the types shared by the landing page components:
//! - `storefront` - The landing page server
//! - `integration-tests` - End-to-end tests against a mocked Shopify API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shopify global IDs and locale-aware prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
