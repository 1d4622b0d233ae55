//! Ranking cache maintenance
//!
//! Keeps the [`RankingCache`] eventually consistent with the store:
//! - `on_brand_changed`: recompute one brand's total and upsert or remove it
//! - `on_brand_deleted`: remove the brand, never failing
//! - `bulk_initialize`: compute every brand's total and swap them in at once
//!
//! All store reads happen before the single cache call, so no store I/O runs
//! while the cache lock is held, and a store failure leaves the cache as it
//! was. The maintainer never retries; that is the delivery mechanism's job.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use catalog_core::{BrandId, CatalogReader, Category, Error, Price, Result};

use crate::events::{BrandEvent, EventHandler};
use crate::ranking::RankingCache;

/// Applies brand events to the ranking cache
pub struct CacheMaintainer {
    store: Arc<dyn CatalogReader>,
    cache: Arc<RankingCache>,
}

impl CacheMaintainer {
    /// Maintain `cache` from `store`
    pub fn new(store: Arc<dyn CatalogReader>, cache: Arc<RankingCache>) -> Self {
        Self { store, cache }
    }

    /// The cache being maintained
    pub fn cache(&self) -> &Arc<RankingCache> {
        &self.cache
    }

    /// Sum of the brand's cheapest product per category
    ///
    /// Returns `Ok(None)` when the brand has no product in any category,
    /// including when the brand itself is gone.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn compute_brand_total(&self, brand_id: BrandId) -> Result<Option<Price>> {
        let mut total: Price = 0;
        let mut found = false;
        for category in Category::ALL {
            if let Some(product) = self
                .store
                .lowest_priced_in_brand_category(brand_id, category)?
            {
                total += product.price;
                found = true;
            }
        }
        Ok(found.then_some(total))
    }

    /// Recompute one brand after a committed change
    ///
    /// Zero qualifying products, or a brand that no longer exists, removes
    /// the brand from the cache.
    ///
    /// # Errors
    ///
    /// Propagates store failures other than "brand not found"; the cache is
    /// left untouched in that case.
    pub fn on_brand_changed(&self, brand_id: BrandId) -> Result<()> {
        info!(target: "catalog::ranking", brand_id = %brand_id, "Processing brand cache update");
        match self.compute_brand_total(brand_id) {
            Ok(Some(total)) => {
                self.cache.upsert(brand_id, total);
                debug!(target: "catalog::ranking", brand_id = %brand_id, total, "Brand total updated");
                Ok(())
            }
            Ok(None) | Err(Error::BrandNotFound(_)) => {
                self.cache.remove(brand_id);
                debug!(target: "catalog::ranking", brand_id = %brand_id, "Brand has no products, removed");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Drop a deleted brand from the cache
    ///
    /// Runs after the deletion is durable, so there is nothing to compensate:
    /// any failure is logged and swallowed.
    pub fn on_brand_deleted(&self, brand_id: BrandId) {
        info!(target: "catalog::ranking", brand_id = %brand_id, "Processing brand cache removal");
        let cache = &self.cache;
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cache.remove(brand_id))) {
            Ok(()) => {
                info!(target: "catalog::ranking", brand_id = %brand_id, "Removed brand from cache");
            }
            Err(e) => {
                error!(
                    target: "catalog::ranking",
                    brand_id = %brand_id,
                    "Failed to remove brand from cache: {}",
                    e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
                );
            }
        }
    }

    /// Total of every brand that has at least one product
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn brand_totals(&self) -> Result<BTreeMap<BrandId, Price>> {
        let mut totals = BTreeMap::new();
        for brand_id in self.store.brand_ids()? {
            match self.compute_brand_total(brand_id) {
                Ok(Some(total)) => {
                    totals.insert(brand_id, total);
                }
                // Deleted between listing and summing, or no products yet
                Ok(None) | Err(Error::BrandNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(totals)
    }

    /// Rebuild the cache from the whole store
    ///
    /// Brands without products are skipped. Returns the number of brands
    /// loaded.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the cache keeps its previous contents.
    pub fn bulk_initialize(&self) -> Result<usize> {
        info!(target: "catalog::ranking", "Starting cache initialization");
        let totals = self.brand_totals()?;
        let loaded = totals.len();
        self.cache.initialize(totals);
        info!(target: "catalog::ranking", brands = loaded, "Cache initialization completed");
        Ok(loaded)
    }
}

impl EventHandler for CacheMaintainer {
    fn handle(&self, event: &BrandEvent) -> Result<()> {
        match *event {
            BrandEvent::Changed(brand_id) => self.on_brand_changed(brand_id),
            BrandEvent::Deleted(brand_id) => {
                self.on_brand_deleted(brand_id);
                Ok(())
            }
        }
    }
}
