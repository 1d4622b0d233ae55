//! Error types for the catalog
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::category::Category;
use crate::types::{BrandId, ProductId};
use std::io;
use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the catalog
#[derive(Debug, Error)]
pub enum Error {
    /// Brand does not exist in the store
    #[error("Brand(id: {0}) not found")]
    BrandNotFound(BrandId),

    /// Product does not exist in the store
    #[error("Product(id: {0}) not found")]
    ProductNotFound(ProductId),

    /// A category holds no products, so no extreme-priced product exists
    #[error("No product found in category {0}")]
    CategoryEmpty(Category),

    /// The ranking cache holds no brand at all
    #[error("No brand package available")]
    NoBrandPackage,

    /// Brand name is already taken by another brand
    #[error("Brand(name: {0}) already exists")]
    DuplicateBrandName(String),

    /// Request failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store could not serve the request (connectivity, corruption, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an `InvalidInput` error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a `Storage` error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors that mean "the thing asked for is absent"
    ///
    /// `NoBrandPackage` is included: an empty ranking is a valid state that
    /// callers report as "nothing available", not as a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::BrandNotFound(_)
                | Error::ProductNotFound(_)
                | Error::CategoryEmpty(_)
                | Error::NoBrandPackage
        )
    }
}
