//! Aggregate read results returned by [`crate::CatalogService`].

use serde::{Deserialize, Serialize};

use catalog_core::{Brand, Category, Price, Product};

/// Cheapest product of every category, across all brands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowestPricedProducts {
    /// One product per category, in `Category::ALL` order
    pub products: Vec<Product>,
    /// Sum of the listed prices
    pub total_price: Price,
}

/// Cheapest and most expensive products of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowestHighestPricedProducts {
    /// Category queried
    pub category: Category,
    /// Every product tied at the lowest price, by product id
    pub lowest: Vec<Product>,
    /// Every product tied at the highest price, by product id
    pub highest: Vec<Product>,
}

/// The brand whose one-of-each-category package is cheapest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandPackage {
    /// Winning brand
    pub brand: Brand,
    /// Package price as ranked by the cache
    pub total_price: Price,
    /// The brand's cheapest product per category, in `Category::ALL` order
    pub products: Vec<Product>,
}
