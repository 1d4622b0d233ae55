//! Catalog bootstrap
//!
//! `Catalog::open` wires the store, ranking cache, maintainer, event
//! delivery and service together, then warms the cache from the store
//! before any request is served.

use std::sync::Arc;

use tracing::info;

use catalog_core::{CatalogReader, CatalogStore, Result};
use catalog_storage::MemoryCatalogStore;

use crate::config::{CatalogConfig, DeliveryMode};
use crate::dispatcher::{DispatcherStats, EventDispatcher};
use crate::events::{EventSink, InlineSink};
use crate::maintainer::CacheMaintainer;
use crate::ranking::RankingCache;
use crate::service::CatalogService;

/// An open catalog
///
/// # Example
///
/// ```ignore
/// use catalog_engine::{Catalog, CatalogConfig};
/// use catalog_core::Category;
///
/// let catalog = Catalog::in_memory(CatalogConfig::inline())?;
/// let brand = catalog.service().create_brand("A")?;
/// catalog.service().create_product(brand.id, Category::Top, 11_200)?;
/// let package = catalog.service().lowest_total_priced_brand_package()?;
/// ```
pub struct Catalog {
    config: CatalogConfig,
    cache: Arc<RankingCache>,
    maintainer: Arc<CacheMaintainer>,
    service: CatalogService,
    dispatcher: Option<Arc<EventDispatcher>>,
}

impl Catalog {
    /// Open a catalog over `store`
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the dispatcher workers
    /// cannot start, or the warm-up read fails.
    pub fn open<S>(store: Arc<S>, config: CatalogConfig) -> Result<Self>
    where
        S: CatalogStore + 'static,
    {
        config.validate()?;

        let reader: Arc<dyn CatalogReader> = store.clone();
        let writer: Arc<dyn CatalogStore> = store;

        let cache = Arc::new(RankingCache::new());
        let maintainer = Arc::new(CacheMaintainer::new(reader, cache.clone()));

        if config.warmup_on_open {
            maintainer.bulk_initialize()?;
        }

        let mut dispatcher = None;
        let events: Arc<dyn EventSink> = match config.delivery {
            DeliveryMode::Inline => Arc::new(InlineSink::new(maintainer.clone())),
            DeliveryMode::Dispatcher => {
                let started = Arc::new(EventDispatcher::new(
                    maintainer.clone(),
                    config.event_workers,
                    config.event_queue_capacity,
                    config.event_max_attempts,
                )?);
                dispatcher = Some(started.clone());
                started
            }
        };

        let service = CatalogService::new(writer, cache.clone(), maintainer.clone(), events);

        info!(
            target: "catalog::open",
            delivery = ?config.delivery,
            cached_brands = cache.len(),
            "Catalog opened"
        );

        Ok(Self {
            config,
            cache,
            maintainer,
            service,
            dispatcher,
        })
    }

    /// Open a catalog over a fresh in-memory store
    pub fn in_memory(config: CatalogConfig) -> Result<Self> {
        Self::open(Arc::new(MemoryCatalogStore::new()), config)
    }

    /// Configuration the catalog was opened with
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Application service
    pub fn service(&self) -> &CatalogService {
        &self.service
    }

    /// Ranking cache
    pub fn cache(&self) -> &Arc<RankingCache> {
        &self.cache
    }

    /// Cache maintainer
    pub fn maintainer(&self) -> &Arc<CacheMaintainer> {
        &self.maintainer
    }

    /// Block until every published event has been handled
    ///
    /// Returns immediately with inline delivery.
    pub fn drain_events(&self) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.drain();
        }
    }

    /// Dispatcher metrics, `None` with inline delivery
    pub fn dispatcher_stats(&self) -> Option<DispatcherStats> {
        self.dispatcher.as_ref().map(|d| d.stats())
    }

    /// Finish queued events and stop the dispatcher workers
    ///
    /// Events published afterwards are rejected. Safe to call more than once.
    pub fn shutdown(&self) {
        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.shutdown();
            info!(target: "catalog::open", "Event dispatcher stopped");
        }
    }
}

impl Drop for Catalog {
    fn drop(&mut self) {
        self.shutdown();
    }
}
