//! Catalog - brand catalog with a cached cheapest-package ranking
//!
//! Brands sell products in eight fixed categories. The catalog answers three
//! aggregate questions, the most expensive of which ("which single brand
//! sells the cheapest one-of-each-category package?") is served from an
//! in-memory ranking cache kept in sync by brand events.
//!
//! # Quick Start
//!
//! ```ignore
//! use catalog::{Catalog, CatalogConfig, Category};
//!
//! let catalog = Catalog::in_memory(CatalogConfig::inline())?;
//! let service = catalog.service();
//!
//! let brand = service.create_brand("A")?;
//! service.create_product(brand.id, Category::Top, 11_200)?;
//!
//! let package = service.lowest_total_priced_brand_package()?;
//! ```
//!
//! # Architecture
//!
//! - `catalog-core`: domain types, errors, store traits
//! - `catalog-storage`: in-memory indexed store
//! - `catalog-engine`: ranking cache, maintainer, event delivery, service
//!
//! With the default dispatcher delivery the cache is eventually consistent:
//! call [`Catalog::drain_events`] to wait for it to catch up.

pub mod sample;

pub use catalog_core::*;
pub use catalog_engine::*;
pub use catalog_storage::MemoryCatalogStore;
