//! Catalog engine
//!
//! This crate ties the store to the brand ranking cache:
//! - RankingCache: ordered index of brand package totals
//! - CacheMaintainer: recomputes totals from the store on brand events
//! - EventDispatcher: background, brand-ordered event delivery
//! - CatalogService: CRUD and aggregate reads
//! - Catalog: bootstrap and warm-up
//!
//! The engine is the only component that knows about:
//! - When the cache is updated relative to a commit
//! - How events reach the maintainer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod events;
pub mod maintainer;
pub mod models;
pub mod ranking;
pub mod service;

pub use catalog::Catalog;
pub use config::{CatalogConfig, DeliveryMode, CONFIG_FILE_NAME};
pub use dispatcher::{DispatcherStats, EventDispatcher};
pub use events::{BrandEvent, EventHandler, EventSink, InlineSink, RecordingSink};
pub use maintainer::CacheMaintainer;
pub use models::{BrandPackage, LowestHighestPricedProducts, LowestPricedProducts};
pub use ranking::{BrandTotal, RankingCache, RankingIndex};
pub use service::CatalogService;
