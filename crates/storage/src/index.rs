//! Secondary price indices for efficient extreme-price queries
//!
//! This module provides the index that lets the store answer "cheapest /
//! most expensive product in X" without scanning the product table:
//! - `PriceIndex<Category>`: category → products ordered by (price, id)
//! - `PriceIndex<(BrandId, Category)>`: brand+category → products ordered by (price, id)
//!
//! Both are maintained by `MemoryCatalogStore` inside the same write lock as
//! the product table.

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::hash::Hash;

use catalog_core::{Price, ProductId};

/// Secondary index: K → {(price, product_id)}
///
/// Entries order by price first, product id second, so the first entry of a
/// set is the cheapest product with the lowest id among equal prices.
#[derive(Debug)]
pub struct PriceIndex<K> {
    index: FxHashMap<K, BTreeSet<(Price, ProductId)>>,
}

impl<K: Eq + Hash> Default for PriceIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> PriceIndex<K> {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
        }
    }

    /// Add a product under key
    pub fn insert(&mut self, key: K, price: Price, id: ProductId) {
        self.index.entry(key).or_default().insert((price, id));
    }

    /// Remove a product from key
    ///
    /// If the set becomes empty, the key is removed entirely
    /// to avoid accumulating empty sets.
    pub fn remove(&mut self, key: &K, price: Price, id: ProductId) {
        if let Some(entries) = self.index.get_mut(key) {
            entries.remove(&(price, id));
            if entries.is_empty() {
                self.index.remove(key);
            }
        }
    }

    /// Cheapest entry under key (lowest id among equal prices)
    pub fn lowest(&self, key: &K) -> Option<(Price, ProductId)> {
        self.index.get(key).and_then(|entries| entries.first().copied())
    }

    /// Every product tied at the lowest price under key, ascending by id
    pub fn lowest_ties(&self, key: &K) -> Vec<ProductId> {
        let Some(entries) = self.index.get(key) else {
            return Vec::new();
        };
        let Some(&(min, _)) = entries.first() else {
            return Vec::new();
        };
        entries
            .iter()
            .take_while(|(price, _)| *price == min)
            .map(|(_, id)| *id)
            .collect()
    }

    /// Every product tied at the highest price under key, ascending by id
    pub fn highest_ties(&self, key: &K) -> Vec<ProductId> {
        let Some(entries) = self.index.get(key) else {
            return Vec::new();
        };
        let Some(&(max, _)) = entries.last() else {
            return Vec::new();
        };
        let mut ids: Vec<ProductId> = entries
            .iter()
            .rev()
            .take_while(|(price, _)| *price == max)
            .map(|(_, id)| *id)
            .collect();
        ids.reverse();
        ids
    }

    /// All product ids under key, in (price, id) order
    pub fn ids(&self, key: &K) -> Vec<ProductId> {
        self.index
            .get(key)
            .map(|entries| entries.iter().map(|(_, id)| *id).collect())
            .unwrap_or_default()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the number of keys in the index
    pub fn len(&self) -> usize {
        self.index.len()
    }
}
