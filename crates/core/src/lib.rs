//! Core types and traits for the catalog
//!
//! This crate defines the foundational types used throughout the system:
//! - BrandId / ProductId: Integer identifiers for store rows
//! - Category: The fixed, ordered list of product categories
//! - Brand / Product / ProductRecord: Domain model
//! - Price helpers: limits and display formatting
//! - Error: Error type hierarchy
//! - Traits: Store abstraction (CatalogReader, CatalogStore)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod error;
pub mod limits;
pub mod price;
pub mod traits;
pub mod types;

pub use category::Category;
pub use error::{Error, Result};
pub use limits::{validate_brand_name, validate_price, MAX_BRAND_NAME_CHARS, MAX_PRICE};
pub use price::{format_price, Price};
pub use traits::{CatalogReader, CatalogStore};
pub use types::{Brand, BrandId, Product, ProductId, ProductRecord, ProductUpdate};
