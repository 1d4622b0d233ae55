//! Storage layer for the catalog
//!
//! This crate implements the in-memory system of record with:
//! - MemoryCatalogStore: BTreeMap tables behind one RwLock, one commit per call
//! - Secondary price indices (per category, per brand+category)
//! - Monotonic id allocation with AtomicU64
//!
//! A relational backend would implement the same `CatalogStore` trait from
//! `catalog-core`; the engine only sees the trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;

pub use index::PriceIndex;
pub use memory::MemoryCatalogStore;
