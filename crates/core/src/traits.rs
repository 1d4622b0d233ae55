//! Core traits for store abstraction
//!
//! This module defines the CatalogReader and CatalogStore traits that let the
//! engine run against any system of record: the in-memory store used in tests
//! and demos, or a relational backend.
//!
//! Thread safety: all methods must be safe to call concurrently from multiple
//! threads (requires Send + Sync).

use crate::category::Category;
use crate::error::Result;
use crate::price::Price;
use crate::types::{Brand, BrandId, ProductId, ProductRecord, ProductUpdate};

/// Read side of the system of record
///
/// Point and range queries with read-committed consistency. This is the only
/// surface the ranking maintainer depends on.
pub trait CatalogReader: Send + Sync {
    /// Look up a brand by id
    ///
    /// Returns None if the brand doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn brand(&self, id: BrandId) -> Result<Option<Brand>>;

    /// All brand ids, ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn brand_ids(&self) -> Result<Vec<BrandId>>;

    /// Look up a product row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn product(&self, id: ProductId) -> Result<Option<ProductRecord>>;

    /// Cheapest product a brand sells in one category
    ///
    /// Ties are broken by the lowest product id. Returns None when the brand
    /// has no product in the category (including when the brand is unknown).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn lowest_priced_in_brand_category(
        &self,
        brand_id: BrandId,
        category: Category,
    ) -> Result<Option<ProductRecord>>;

    /// Every product tied at the lowest price of a category, by product id
    ///
    /// Empty when the category holds no products.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn lowest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>>;

    /// Every product tied at the highest price of a category, by product id
    ///
    /// Empty when the category holds no products.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn highest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>>;
}

/// Write side of the system of record
///
/// Every method is one atomic commit: when it returns `Ok`, the change is
/// visible to all subsequent reads.
pub trait CatalogStore: CatalogReader {
    /// Insert a brand with a unique name
    ///
    /// # Errors
    ///
    /// `DuplicateBrandName` if the name is taken.
    fn insert_brand(&self, name: &str) -> Result<Brand>;

    /// Rename a brand
    ///
    /// Renaming a brand to its current name succeeds.
    ///
    /// # Errors
    ///
    /// `BrandNotFound` for an unknown id, `DuplicateBrandName` if another
    /// brand holds the name.
    fn rename_brand(&self, id: BrandId, name: &str) -> Result<Brand>;

    /// Delete a brand and every product it owns
    ///
    /// Returns the ids of the deleted products.
    ///
    /// # Errors
    ///
    /// `BrandNotFound` for an unknown id.
    fn delete_brand(&self, id: BrandId) -> Result<Vec<ProductId>>;

    /// Insert a product
    ///
    /// # Errors
    ///
    /// `BrandNotFound` if the owning brand doesn't exist.
    fn insert_product(
        &self,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductRecord>;

    /// Replace every field of a product
    ///
    /// Returns the row as it was before and after this commit, both read
    /// under the same write.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown id, `BrandNotFound` if the new owning
    /// brand doesn't exist.
    fn update_product(
        &self,
        id: ProductId,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductUpdate>;

    /// Delete a product, returning the deleted row
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown id.
    fn delete_product(&self, id: ProductId) -> Result<ProductRecord>;
}
