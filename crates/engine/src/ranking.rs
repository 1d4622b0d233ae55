//! Brand total-price ranking cache
//!
//! Keeps, for every brand, the sum of its cheapest product per category, and
//! answers "which brand has the cheapest one-of-each-category package"
//! without touching the store.
//!
//! ## Structure
//!
//! Two maps over the same key space, always updated together:
//! - `total_by_brand`: BrandId → total (unique keys, O(1) lookup)
//! - `brands_by_total`: total → {BrandId}, ordered by total (O(log n) min)
//!
//! A brand is a member of exactly the bucket matching its total. Buckets are
//! dropped as soon as they empty. A brand with no qualifying products is
//! absent, never stored with total 0.
//!
//! ## Concurrency
//!
//! One `parking_lot::RwLock` guards both maps. Mutations hold the write lock
//! for their whole duration, so the move from the old bucket to the new one
//! inside `upsert` is never visible to readers.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use catalog_core::{BrandId, Price};

/// A brand and the price of its cheapest one-of-each-category package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BrandTotal {
    /// Brand
    pub brand_id: BrandId,
    /// Sum of the brand's cheapest product per category
    pub total_price: Price,
}

/// Unsynchronized ranking state
///
/// `RankingCache` wraps this in a lock; on its own it is a plain value type.
#[derive(Debug, Default, Clone)]
pub struct RankingIndex {
    total_by_brand: FxHashMap<BrandId, Price>,
    brands_by_total: BTreeMap<Price, BTreeSet<BrandId>>,
}

impl RankingIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a brand's total
    pub fn upsert(&mut self, brand_id: BrandId, total_price: Price) {
        if self.total_by_brand.get(&brand_id) == Some(&total_price) {
            return;
        }
        self.remove(brand_id);
        self.total_by_brand.insert(brand_id, total_price);
        self.brands_by_total
            .entry(total_price)
            .or_default()
            .insert(brand_id);
    }

    /// Remove a brand; absent brands are ignored
    ///
    /// Returns the total the brand had.
    pub fn remove(&mut self, brand_id: BrandId) -> Option<Price> {
        let total = self.total_by_brand.remove(&brand_id)?;
        if let Some(brands) = self.brands_by_total.get_mut(&total) {
            brands.remove(&brand_id);
            if brands.is_empty() {
                self.brands_by_total.remove(&total);
            }
        }
        Some(total)
    }

    /// Brand with the lowest total
    ///
    /// On ties any member of the lowest bucket may be returned.
    pub fn lowest(&self) -> Option<BrandTotal> {
        let (&total_price, brands) = self.brands_by_total.first_key_value()?;
        brands.first().map(|&brand_id| BrandTotal {
            brand_id,
            total_price,
        })
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.total_by_brand.clear();
        self.brands_by_total.clear();
    }

    /// Total of one brand
    pub fn total_of(&self, brand_id: BrandId) -> Option<Price> {
        self.total_by_brand.get(&brand_id).copied()
    }

    /// Members of the bucket at `total_price`, ascending
    pub fn brands_at(&self, total_price: Price) -> Option<Vec<BrandId>> {
        self.brands_by_total
            .get(&total_price)
            .map(|brands| brands.iter().copied().collect())
    }

    /// Number of brands
    pub fn len(&self) -> usize {
        self.total_by_brand.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.total_by_brand.is_empty()
    }

    /// Number of distinct totals
    pub fn bucket_count(&self) -> usize {
        self.brands_by_total.len()
    }

    /// Sorted snapshot of every brand's total
    pub fn entries(&self) -> BTreeMap<BrandId, Price> {
        self.total_by_brand
            .iter()
            .map(|(&brand_id, &total)| (brand_id, total))
            .collect()
    }

    /// Check that both maps describe the same ranking
    ///
    /// Returns a description of the first violation found.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut members = 0usize;
        for (&total, brands) in &self.brands_by_total {
            if brands.is_empty() {
                return Err(format!("empty bucket at {}", total));
            }
            for brand_id in brands {
                members += 1;
                match self.total_by_brand.get(brand_id) {
                    Some(&t) if t == total => {}
                    Some(&t) => {
                        return Err(format!(
                            "brand {} in bucket {} but total is {}",
                            brand_id, total, t
                        ))
                    }
                    None => {
                        return Err(format!(
                            "brand {} in bucket {} but has no total",
                            brand_id, total
                        ))
                    }
                }
            }
        }
        if members != self.total_by_brand.len() {
            return Err(format!(
                "{} bucket members but {} totals",
                members,
                self.total_by_brand.len()
            ));
        }
        Ok(())
    }
}

impl FromIterator<(BrandId, Price)> for RankingIndex {
    fn from_iter<I: IntoIterator<Item = (BrandId, Price)>>(iter: I) -> Self {
        let mut index = RankingIndex::new();
        for (brand_id, total) in iter {
            index.upsert(brand_id, total);
        }
        index
    }
}

/// Thread-safe ranking cache
///
/// Explicitly constructed and shared through `Arc`; the process discards it on
/// shutdown and rebuilds it from the store on the next start.
#[derive(Debug, Default)]
pub struct RankingCache {
    index: RwLock<RankingIndex>,
}

impl RankingCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a brand's total
    ///
    /// Re-upserting the same total is a no-op.
    pub fn upsert(&self, brand_id: BrandId, total_price: Price) {
        self.index.write().upsert(brand_id, total_price);
    }

    /// Remove a brand; absent brands are ignored
    pub fn remove(&self, brand_id: BrandId) {
        self.index.write().remove(brand_id);
    }

    /// Brand with the lowest total, or None when the cache is empty
    pub fn lowest_total_priced_brand(&self) -> Option<BrandTotal> {
        self.index.read().lowest()
    }

    /// Replace all state with `entries`
    ///
    /// The new index is built before the write lock is taken and swapped in
    /// whole, so readers see either the old ranking or the new one.
    pub fn initialize<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (BrandId, Price)>,
    {
        let fresh: RankingIndex = entries.into_iter().collect();
        *self.index.write() = fresh;
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.index.write().clear();
    }

    /// Total of one brand
    pub fn total_of(&self, brand_id: BrandId) -> Option<Price> {
        self.index.read().total_of(brand_id)
    }

    /// Members of the bucket at `total_price`, ascending
    pub fn brands_at(&self, total_price: Price) -> Option<Vec<BrandId>> {
        self.index.read().brands_at(total_price)
    }

    /// Number of brands
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Sorted snapshot of every brand's total
    pub fn entries(&self) -> BTreeMap<BrandId, Price> {
        self.index.read().entries()
    }

    /// Run `check_consistency` under the read lock
    pub fn check_consistency(&self) -> Result<(), String> {
        self.index.read().check_consistency()
    }
}
