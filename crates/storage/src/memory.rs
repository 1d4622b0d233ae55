//! MemoryCatalogStore: in-memory system of record for brands and products
//!
//! This module implements the CatalogStore trait using:
//! - `BTreeMap` tables for brands and products (ordered by id)
//! - `parking_lot::RwLock` around all tables, so each write is one atomic commit
//! - `AtomicU64` counters for monotonically increasing ids
//! - Secondary price indices for cheapest/most-expensive lookups
//!
//! # Design Notes
//!
//! - **Id allocation before write lock**: a failed insert burns an id, like a
//!   database sequence
//! - **Secondary indices**: updated in the same write lock as the product table,
//!   so readers never see a product without its index entries

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use catalog_core::{
    Brand, BrandId, CatalogReader, CatalogStore, Category, Error, Price, ProductId,
    ProductRecord, ProductUpdate, Result,
};

use crate::index::PriceIndex;

#[derive(Debug, Default)]
struct Tables {
    brands: BTreeMap<BrandId, Brand>,
    brand_names: FxHashMap<String, BrandId>,
    products: BTreeMap<ProductId, ProductRecord>,
    by_category: PriceIndex<Category>,
    by_brand_category: PriceIndex<(BrandId, Category)>,
}

impl Tables {
    fn index_product(&mut self, record: &ProductRecord) {
        self.by_category
            .insert(record.category, record.price, record.id);
        self.by_brand_category
            .insert((record.brand_id, record.category), record.price, record.id);
    }

    fn unindex_product(&mut self, record: &ProductRecord) {
        self.by_category
            .remove(&record.category, record.price, record.id);
        self.by_brand_category
            .remove(&(record.brand_id, record.category), record.price, record.id);
    }

    fn records(&self, ids: Vec<ProductId>) -> Vec<ProductRecord> {
        ids.into_iter()
            .filter_map(|id| self.products.get(&id).cloned())
            .collect()
    }
}

/// In-memory catalog store
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`.
#[derive(Debug)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
    next_brand_id: AtomicU64,
    next_product_id: AtomicU64,
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalogStore {
    /// Create a new empty store
    ///
    /// The first brand and the first product both get id 1.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_brand_id: AtomicU64::new(0),
            next_product_id: AtomicU64::new(0),
        }
    }

    fn allocate_brand_id(&self) -> BrandId {
        BrandId::new(self.next_brand_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn allocate_product_id(&self) -> ProductId {
        ProductId::new(self.next_product_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Number of brands
    pub fn brand_count(&self) -> usize {
        self.tables.read().brands.len()
    }

    /// Number of products
    pub fn product_count(&self) -> usize {
        self.tables.read().products.len()
    }

    /// All product rows owned by a brand, ordered by category then (price, id)
    pub fn products_of_brand(&self, brand_id: BrandId) -> Vec<ProductRecord> {
        let tables = self.tables.read();
        Category::ALL
            .iter()
            .flat_map(|&category| tables.by_brand_category.ids(&(brand_id, category)))
            .filter_map(|id| tables.products.get(&id).cloned())
            .collect()
    }
}

impl CatalogReader for MemoryCatalogStore {
    fn brand(&self, id: BrandId) -> Result<Option<Brand>> {
        Ok(self.tables.read().brands.get(&id).cloned())
    }

    fn brand_ids(&self) -> Result<Vec<BrandId>> {
        Ok(self.tables.read().brands.keys().copied().collect())
    }

    fn product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.tables.read().products.get(&id).cloned())
    }

    fn lowest_priced_in_brand_category(
        &self,
        brand_id: BrandId,
        category: Category,
    ) -> Result<Option<ProductRecord>> {
        let tables = self.tables.read();
        Ok(tables
            .by_brand_category
            .lowest(&(brand_id, category))
            .and_then(|(_, id)| tables.products.get(&id).cloned()))
    }

    fn lowest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>> {
        let tables = self.tables.read();
        Ok(tables.records(tables.by_category.lowest_ties(&category)))
    }

    fn highest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>> {
        let tables = self.tables.read();
        Ok(tables.records(tables.by_category.highest_ties(&category)))
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn insert_brand(&self, name: &str) -> Result<Brand> {
        let id = self.allocate_brand_id();
        let mut tables = self.tables.write();

        if tables.brand_names.contains_key(name) {
            return Err(Error::DuplicateBrandName(name.to_string()));
        }

        let brand = Brand::new(id, name);
        tables.brand_names.insert(name.to_string(), id);
        tables.brands.insert(id, brand.clone());
        debug!(target: "catalog::store", brand_id = %id, brand_name = name, "Brand inserted");
        Ok(brand)
    }

    fn rename_brand(&self, id: BrandId, name: &str) -> Result<Brand> {
        let mut tables = self.tables.write();

        let old_name = match tables.brands.get(&id) {
            Some(brand) => brand.name.clone(),
            None => return Err(Error::BrandNotFound(id)),
        };
        if old_name == name {
            return Ok(Brand::new(id, name));
        }
        if tables.brand_names.contains_key(name) {
            return Err(Error::DuplicateBrandName(name.to_string()));
        }

        tables.brand_names.remove(&old_name);
        tables.brand_names.insert(name.to_string(), id);
        let brand = Brand::new(id, name);
        tables.brands.insert(id, brand.clone());
        debug!(target: "catalog::store", brand_id = %id, brand_name = name, "Brand renamed");
        Ok(brand)
    }

    fn delete_brand(&self, id: BrandId) -> Result<Vec<ProductId>> {
        let mut tables = self.tables.write();

        let brand = tables.brands.remove(&id).ok_or(Error::BrandNotFound(id))?;
        tables.brand_names.remove(&brand.name);

        let owned: Vec<ProductId> = Category::ALL
            .iter()
            .flat_map(|&category| tables.by_brand_category.ids(&(id, category)))
            .collect();
        for product_id in &owned {
            if let Some(record) = tables.products.remove(product_id) {
                tables.unindex_product(&record);
            }
        }

        debug!(
            target: "catalog::store",
            brand_id = %id,
            products_deleted = owned.len(),
            "Brand deleted"
        );
        Ok(owned)
    }

    fn insert_product(
        &self,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductRecord> {
        let id = self.allocate_product_id();
        let mut tables = self.tables.write();

        if !tables.brands.contains_key(&brand_id) {
            return Err(Error::BrandNotFound(brand_id));
        }

        let record = ProductRecord {
            id,
            brand_id,
            category,
            price,
        };
        tables.index_product(&record);
        tables.products.insert(id, record.clone());
        debug!(target: "catalog::store", product_id = %id, brand_id = %brand_id, "Product inserted");
        Ok(record)
    }

    fn update_product(
        &self,
        id: ProductId,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductUpdate> {
        let mut tables = self.tables.write();

        let previous = tables
            .products
            .get(&id)
            .cloned()
            .ok_or(Error::ProductNotFound(id))?;
        if !tables.brands.contains_key(&brand_id) {
            return Err(Error::BrandNotFound(brand_id));
        }

        let record = ProductRecord {
            id,
            brand_id,
            category,
            price,
        };
        tables.unindex_product(&previous);
        tables.index_product(&record);
        tables.products.insert(id, record.clone());
        debug!(
            target: "catalog::store",
            product_id = %id,
            from_brand = %previous.brand_id,
            to_brand = %brand_id,
            "Product updated"
        );
        Ok(ProductUpdate {
            previous,
            current: record,
        })
    }

    fn delete_product(&self, id: ProductId) -> Result<ProductRecord> {
        let mut tables = self.tables.write();

        let record = tables
            .products
            .remove(&id)
            .ok_or(Error::ProductNotFound(id))?;
        tables.unindex_product(&record);
        debug!(target: "catalog::store", product_id = %id, "Product deleted");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_brand(name: &str) -> (MemoryCatalogStore, BrandId) {
        let store = MemoryCatalogStore::new();
        let brand = store.insert_brand(name).unwrap();
        (store, brand.id)
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = MemoryCatalogStore::new();
        let a = store.insert_brand("A").unwrap();
        let b = store.insert_brand("B").unwrap();
        assert_eq!(a.id, BrandId::new(1));
        assert_eq!(b.id, BrandId::new(2));

        let p = store.insert_product(a.id, Category::Top, 100).unwrap();
        assert_eq!(p.id, ProductId::new(1));
    }

    #[test]
    fn test_duplicate_brand_name_rejected() {
        let (store, _) = store_with_brand("A");
        let err = store.insert_brand("A").unwrap_err();
        assert!(matches!(err, Error::DuplicateBrandName(name) if name == "A"));
        assert_eq!(store.brand_count(), 1);
    }

    #[test]
    fn test_rename_brand() {
        let (store, id) = store_with_brand("A");
        store.insert_brand("B").unwrap();

        let renamed = store.rename_brand(id, "Z").unwrap();
        assert_eq!(renamed.name, "Z");
        assert_eq!(store.brand(id).unwrap().unwrap().name, "Z");

        // Old name is free again
        assert!(store.insert_brand("A").is_ok());
        // Taken name is rejected
        assert!(matches!(
            store.rename_brand(id, "B"),
            Err(Error::DuplicateBrandName(_))
        ));
        // Same name is fine
        assert!(store.rename_brand(id, "Z").is_ok());
        // Unknown brand
        assert!(matches!(
            store.rename_brand(BrandId::new(99), "Q"),
            Err(Error::BrandNotFound(_))
        ));
    }

    #[test]
    fn test_insert_product_requires_brand() {
        let store = MemoryCatalogStore::new();
        let err = store
            .insert_product(BrandId::new(1), Category::Top, 100)
            .unwrap_err();
        assert!(matches!(err, Error::BrandNotFound(_)));
        assert_eq!(store.product_count(), 0);
    }

    #[test]
    fn test_lowest_priced_in_brand_category() {
        let (store, a) = store_with_brand("A");
        let b = store.insert_brand("B").unwrap().id;
        store.insert_product(a, Category::Top, 500).unwrap();
        let cheap = store.insert_product(a, Category::Top, 300).unwrap();
        store.insert_product(b, Category::Top, 100).unwrap();

        let found = store
            .lowest_priced_in_brand_category(a, Category::Top)
            .unwrap()
            .unwrap();
        assert_eq!(found, cheap);
        assert!(store
            .lowest_priced_in_brand_category(a, Category::Hat)
            .unwrap()
            .is_none());
        assert!(store
            .lowest_priced_in_brand_category(BrandId::new(77), Category::Top)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_category_extremes_include_ties() {
        let (store, a) = store_with_brand("A");
        let b = store.insert_brand("B").unwrap().id;
        let p1 = store.insert_product(a, Category::Socks, 1_700).unwrap();
        let p2 = store.insert_product(b, Category::Socks, 1_700).unwrap();
        let p3 = store.insert_product(b, Category::Socks, 2_400).unwrap();

        assert_eq!(
            store.lowest_priced_in_category(Category::Socks).unwrap(),
            vec![p1, p2]
        );
        assert_eq!(
            store.highest_priced_in_category(Category::Socks).unwrap(),
            vec![p3]
        );
        assert!(store
            .lowest_priced_in_category(Category::Bag)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_update_product_reindexes() {
        let (store, a) = store_with_brand("A");
        let b = store.insert_brand("B").unwrap().id;
        let p = store.insert_product(a, Category::Top, 500).unwrap();

        let update = store.update_product(p.id, b, Category::Hat, 50).unwrap();
        assert_eq!(update.previous, p);
        assert!(update.brand_moved());
        let updated = update.current;
        assert_eq!(updated.brand_id, b);
        assert_eq!(updated.category, Category::Hat);
        assert_eq!(updated.price, 50);

        assert!(store
            .lowest_priced_in_brand_category(a, Category::Top)
            .unwrap()
            .is_none());
        assert!(store
            .lowest_priced_in_category(Category::Top)
            .unwrap()
            .is_empty());
        assert_eq!(
            store
                .lowest_priced_in_brand_category(b, Category::Hat)
                .unwrap(),
            Some(updated)
        );
    }

    #[test]
    fn test_update_product_errors_leave_row_untouched() {
        let (store, a) = store_with_brand("A");
        let p = store.insert_product(a, Category::Top, 500).unwrap();

        assert!(matches!(
            store.update_product(ProductId::new(99), a, Category::Top, 1),
            Err(Error::ProductNotFound(_))
        ));
        assert!(matches!(
            store.update_product(p.id, BrandId::new(99), Category::Top, 1),
            Err(Error::BrandNotFound(_))
        ));
        assert_eq!(store.product(p.id).unwrap(), Some(p));
    }

    #[test]
    fn test_delete_product() {
        let (store, a) = store_with_brand("A");
        let p = store.insert_product(a, Category::Bag, 900).unwrap();

        let deleted = store.delete_product(p.id).unwrap();
        assert_eq!(deleted, p);
        assert!(store.product(p.id).unwrap().is_none());
        assert!(store
            .lowest_priced_in_category(Category::Bag)
            .unwrap()
            .is_empty());
        assert!(matches!(
            store.delete_product(p.id),
            Err(Error::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_delete_brand_cascades() {
        let (store, a) = store_with_brand("A");
        let b = store.insert_brand("B").unwrap().id;
        let p1 = store.insert_product(a, Category::Top, 100).unwrap();
        let p2 = store.insert_product(a, Category::Hat, 200).unwrap();
        let kept = store.insert_product(b, Category::Top, 300).unwrap();

        let mut deleted = store.delete_brand(a).unwrap();
        deleted.sort();
        assert_eq!(deleted, vec![p1.id, p2.id]);

        assert!(store.brand(a).unwrap().is_none());
        assert_eq!(store.product_count(), 1);
        assert_eq!(
            store.lowest_priced_in_category(Category::Top).unwrap(),
            vec![kept]
        );
        assert!(store.products_of_brand(a).is_empty());
        assert_eq!(store.brand_ids().unwrap(), vec![b]);

        // Name can be reused
        assert!(store.insert_brand("A").is_ok());
        assert!(matches!(store.delete_brand(a), Err(Error::BrandNotFound(_))));
    }

    #[test]
    fn test_products_of_brand_in_category_order() {
        let (store, a) = store_with_brand("A");
        let hat = store.insert_product(a, Category::Hat, 10).unwrap();
        let top = store.insert_product(a, Category::Top, 20).unwrap();

        assert_eq!(store.products_of_brand(a), vec![top, hat]);
    }
}
