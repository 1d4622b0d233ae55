//! Core types for the catalog
//!
//! This module defines the foundational types:
//! - BrandId / ProductId: Store-assigned integer identifiers
//! - Brand: A named seller of products
//! - ProductRecord: A product row as the store keeps it (brand by id)
//! - Product: A product joined with its brand

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;
use crate::price::Price;

/// Unique identifier for a brand
///
/// Assigned by the store on insert. Ordered so it can key BTreeMaps and
/// give deterministic iteration in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(u64);

impl BrandId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BrandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BrandId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A brand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Brand {
    /// Store-assigned id
    pub id: BrandId,
    /// Unique display name
    pub name: String,
}

impl Brand {
    /// Create a brand value
    pub fn new(id: BrandId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A product row as stored: references its brand by id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Store-assigned id
    pub id: ProductId,
    /// Owning brand
    pub brand_id: BrandId,
    /// Category the product is sold under
    pub category: Category,
    /// Price in the smallest currency unit
    pub price: Price,
}

/// Result of an update commit: the row before and after the write
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductUpdate {
    /// Row as it was when the write lock was taken
    pub previous: ProductRecord,
    /// Row as committed
    pub current: ProductRecord,
}

impl ProductUpdate {
    /// True when the product changed owner
    pub fn brand_moved(&self) -> bool {
        self.previous.brand_id != self.current.brand_id
    }
}

/// A product joined with its brand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned id
    pub id: ProductId,
    /// Owning brand
    pub brand: Brand,
    /// Category the product is sold under
    pub category: Category,
    /// Price in the smallest currency unit
    pub price: Price,
}

impl Product {
    /// Join a stored row with its brand
    ///
    /// The caller is responsible for passing the brand the row points at.
    pub fn from_record(record: ProductRecord, brand: Brand) -> Self {
        debug_assert_eq!(record.brand_id, brand.id);
        Self {
            id: record.id,
            brand,
            category: record.category,
            price: record.price,
        }
    }
}
