//! Catalog application service
//!
//! Brand/product CRUD plus the aggregate reads. Every write commits to the
//! store first and publishes the matching [`BrandEvent`] only once the commit
//! returned, so the ranking cache never sees an uncommitted change.
//!
//! ## Events published
//!
//! | Operation        | Events                                                  |
//! |------------------|---------------------------------------------------------|
//! | create_brand     | none (a brand without products has no total)            |
//! | rename_brand     | `Changed(id)`                                           |
//! | delete_brand     | `Deleted(id)`                                           |
//! | create_product   | `Changed(brand)`                                        |
//! | update_product   | `Changed(old brand)`, plus `Changed(new brand)` if moved |
//! | delete_product   | `Changed(brand)`                                        |

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use catalog_core::{
    validate_brand_name, validate_price, Brand, BrandId, CatalogStore, Category, Error, Price,
    Product, ProductId, ProductRecord, Result,
};

use crate::events::{BrandEvent, EventSink};
use crate::maintainer::CacheMaintainer;
use crate::models::{BrandPackage, LowestHighestPricedProducts, LowestPricedProducts};
use crate::ranking::RankingCache;

/// Application layer over the store, the ranking cache and the event sink
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    cache: Arc<RankingCache>,
    maintainer: Arc<CacheMaintainer>,
    events: Arc<dyn EventSink>,
}

impl CatalogService {
    /// Wire a service from its collaborators
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<RankingCache>,
        maintainer: Arc<CacheMaintainer>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            cache,
            maintainer,
            events,
        }
    }

    fn publish(&self, event: BrandEvent) {
        debug!(target: "catalog::service", event = %event, "Publishing brand event");
        self.events.publish(event);
    }

    fn load_brand(&self, id: BrandId) -> Result<Brand> {
        self.store.brand(id)?.ok_or(Error::BrandNotFound(id))
    }

    fn join(&self, record: ProductRecord) -> Result<Product> {
        let brand = self.load_brand(record.brand_id)?;
        Ok(Product::from_record(record, brand))
    }

    fn join_all(&self, records: Vec<ProductRecord>) -> Result<Vec<Product>> {
        records.into_iter().map(|r| self.join(r)).collect()
    }

    // ========================================================================
    // Brands
    // ========================================================================

    /// Look up a brand
    pub fn brand(&self, id: BrandId) -> Result<Brand> {
        self.load_brand(id)
    }

    /// Create a brand
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank or overlong name, `DuplicateBrandName` if
    /// the name is taken.
    pub fn create_brand(&self, name: &str) -> Result<Brand> {
        let name = validate_brand_name(name)?;
        self.store.insert_brand(&name)
    }

    /// Rename a brand
    pub fn rename_brand(&self, id: BrandId, name: &str) -> Result<Brand> {
        let name = validate_brand_name(name)?;
        let brand = self.store.rename_brand(id, &name)?;
        self.publish(BrandEvent::Changed(id));
        Ok(brand)
    }

    /// Delete a brand and all its products
    pub fn delete_brand(&self, id: BrandId) -> Result<()> {
        self.store.delete_brand(id)?;
        self.publish(BrandEvent::Deleted(id));
        Ok(())
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Look up a product with its brand
    pub fn product(&self, id: ProductId) -> Result<Product> {
        let record = self.store.product(id)?.ok_or(Error::ProductNotFound(id))?;
        self.join(record)
    }

    /// Create a product
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a price above `MAX_PRICE`, `BrandNotFound` for an
    /// unknown brand.
    pub fn create_product(
        &self,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<Product> {
        validate_price(price)?;
        let record = self.store.insert_product(brand_id, category, price)?;
        self.publish(BrandEvent::Changed(brand_id));
        self.join(record)
    }

    /// Replace a product's brand, category and price
    pub fn update_product(
        &self,
        id: ProductId,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<Product> {
        validate_price(price)?;
        // Previous owner as seen by this commit, not by an earlier read
        let update = self.store.update_product(id, brand_id, category, price)?;

        self.publish(BrandEvent::Changed(update.previous.brand_id));
        if update.brand_moved() {
            self.publish(BrandEvent::Changed(update.current.brand_id));
        }
        self.join(update.current)
    }

    /// Delete a product
    pub fn delete_product(&self, id: ProductId) -> Result<()> {
        let record = self.store.delete_product(id)?;
        self.publish(BrandEvent::Changed(record.brand_id));
        Ok(())
    }

    // ========================================================================
    // Aggregate reads
    // ========================================================================

    /// Cheapest product of every category and their sum
    ///
    /// Ties pick the lowest product id.
    ///
    /// # Errors
    ///
    /// `CategoryEmpty` if any category has no product.
    pub fn lowest_priced_products(&self) -> Result<LowestPricedProducts> {
        let mut products = Vec::with_capacity(Category::ALL.len());
        let mut total_price: Price = 0;
        for category in Category::ALL {
            let record = self
                .store
                .lowest_priced_in_category(category)?
                .into_iter()
                .next()
                .ok_or(Error::CategoryEmpty(category))?;
            total_price += record.price;
            products.push(self.join(record)?);
        }
        Ok(LowestPricedProducts {
            products,
            total_price,
        })
    }

    /// Cheapest and most expensive products of one category, ties included
    ///
    /// # Errors
    ///
    /// `CategoryEmpty` if the category has no product.
    pub fn lowest_highest_priced_products(
        &self,
        category: Category,
    ) -> Result<LowestHighestPricedProducts> {
        let lowest = self.store.lowest_priced_in_category(category)?;
        if lowest.is_empty() {
            return Err(Error::CategoryEmpty(category));
        }
        let highest = self.store.highest_priced_in_category(category)?;
        Ok(LowestHighestPricedProducts {
            category,
            lowest: self.join_all(lowest)?,
            highest: self.join_all(highest)?,
        })
    }

    /// The brand whose one-of-each-category package is cheapest
    ///
    /// The ranking comes from the cache; only the winning brand's products
    /// are read from the store.
    ///
    /// # Errors
    ///
    /// `NoBrandPackage` when no brand has any product (or the cache has not
    /// been initialized yet).
    pub fn lowest_total_priced_brand_package(&self) -> Result<BrandPackage> {
        let lowest = self
            .cache
            .lowest_total_priced_brand()
            .ok_or(Error::NoBrandPackage)?;
        let brand = self.load_brand(lowest.brand_id)?;

        let mut products = Vec::new();
        for category in Category::ALL {
            if let Some(record) = self
                .store
                .lowest_priced_in_brand_category(brand.id, category)?
            {
                products.push(Product::from_record(record, brand.clone()));
            }
        }

        Ok(BrandPackage {
            brand,
            total_price: lowest.total_price,
            products,
        })
    }

    /// Every brand's package total, recomputed from the store
    pub fn brand_total_prices(&self) -> Result<BTreeMap<BrandId, Price>> {
        self.maintainer.brand_totals()
    }
}
