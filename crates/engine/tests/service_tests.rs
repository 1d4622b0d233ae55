//! Write-path tests against an interleaving store
//!
//! `InterleavingStore` runs a one-shot callback inside `update_product`, before
//! the wrapped store commits. The callback plays a second writer, so the
//! outer update commits against state that changed after it was issued.

use std::sync::Arc;

use parking_lot::Mutex;

use catalog_core::{
    Brand, BrandId, CatalogReader, CatalogStore, Category, Price, ProductId, ProductRecord,
    ProductUpdate, Result,
};
use catalog_engine::{CacheMaintainer, CatalogService, EventSink, InlineSink, RankingCache};
use catalog_storage::MemoryCatalogStore;

// ============================================================================
// Test Helpers
// ============================================================================

type Interleave = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct InterleavingStore {
    inner: MemoryCatalogStore,
    before_update: Mutex<Option<Interleave>>,
}

impl InterleavingStore {
    fn before_next_update(&self, f: impl FnOnce() + Send + 'static) {
        *self.before_update.lock() = Some(Box::new(f));
    }
}

impl CatalogReader for InterleavingStore {
    fn brand(&self, id: BrandId) -> Result<Option<Brand>> {
        self.inner.brand(id)
    }

    fn brand_ids(&self) -> Result<Vec<BrandId>> {
        self.inner.brand_ids()
    }

    fn product(&self, id: ProductId) -> Result<Option<ProductRecord>> {
        self.inner.product(id)
    }

    fn lowest_priced_in_brand_category(
        &self,
        brand_id: BrandId,
        category: Category,
    ) -> Result<Option<ProductRecord>> {
        self.inner.lowest_priced_in_brand_category(brand_id, category)
    }

    fn lowest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>> {
        self.inner.lowest_priced_in_category(category)
    }

    fn highest_priced_in_category(&self, category: Category) -> Result<Vec<ProductRecord>> {
        self.inner.highest_priced_in_category(category)
    }
}

impl CatalogStore for InterleavingStore {
    fn insert_brand(&self, name: &str) -> Result<Brand> {
        self.inner.insert_brand(name)
    }

    fn rename_brand(&self, id: BrandId, name: &str) -> Result<Brand> {
        self.inner.rename_brand(id, name)
    }

    fn delete_brand(&self, id: BrandId) -> Result<Vec<ProductId>> {
        self.inner.delete_brand(id)
    }

    fn insert_product(
        &self,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductRecord> {
        self.inner.insert_product(brand_id, category, price)
    }

    fn update_product(
        &self,
        id: ProductId,
        brand_id: BrandId,
        category: Category,
        price: Price,
    ) -> Result<ProductUpdate> {
        let interleave = self.before_update.lock().take();
        if let Some(f) = interleave {
            f();
        }
        self.inner.update_product(id, brand_id, category, price)
    }

    fn delete_product(&self, id: ProductId) -> Result<ProductRecord> {
        self.inner.delete_product(id)
    }
}

fn setup() -> (Arc<InterleavingStore>, Arc<RankingCache>, Arc<CatalogService>) {
    let store = Arc::new(InterleavingStore::default());
    let cache = Arc::new(RankingCache::new());
    let maintainer = Arc::new(CacheMaintainer::new(store.clone(), cache.clone()));
    let events: Arc<dyn EventSink> = Arc::new(InlineSink::new(maintainer.clone()));
    let service = Arc::new(CatalogService::new(
        store.clone(),
        cache.clone(),
        maintainer,
        events,
    ));
    (store, cache, service)
}

// ============================================================================
// Concurrent moves of one product
// ============================================================================

#[test]
fn move_racing_another_move_notifies_the_intermediate_owner() {
    let (store, cache, service) = setup();
    let a = service.create_brand("A").unwrap().id;
    let b = service.create_brand("B").unwrap().id;
    let c = service.create_brand("C").unwrap().id;
    let p = service.create_product(a, Category::Top, 100).unwrap().id;

    // While the move to C is in progress, another writer moves p to B
    let other = Arc::clone(&service);
    store.before_next_update(move || {
        other.update_product(p, b, Category::Top, 100).unwrap();
    });
    let moved = service.update_product(p, c, Category::Top, 100).unwrap();
    assert_eq!(moved.brand.id, c);

    // B owned p only between the two commits and must not stay ranked
    assert_eq!(cache.total_of(a), None);
    assert_eq!(cache.total_of(b), None);
    assert_eq!(cache.total_of(c), Some(100));
    assert_eq!(cache.entries(), service.brand_total_prices().unwrap());
}

#[test]
fn update_in_place_racing_a_move_follows_the_product() {
    let (store, cache, service) = setup();
    let a = service.create_brand("A").unwrap().id;
    let b = service.create_brand("B").unwrap().id;
    let p = service.create_product(a, Category::Hat, 300).unwrap().id;

    // Caller believes p is still A's; another writer moved it to B first
    let other = Arc::clone(&service);
    store.before_next_update(move || {
        other.update_product(p, b, Category::Hat, 300).unwrap();
    });
    service.update_product(p, a, Category::Hat, 250).unwrap();

    assert_eq!(cache.total_of(a), Some(250));
    assert_eq!(cache.total_of(b), None);
    assert_eq!(cache.entries(), service.brand_total_prices().unwrap());
}
