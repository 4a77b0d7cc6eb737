//! Catalog module - Store menu configuration and the matching index.
//!
//! The store file (menu categories, settings, price table) is parsed by an
//! adapter and consumed here as already-structured data. `CatalogIndex`
//! flattens it into a uniform list of orderable entries with alias sets.

mod index;
mod store;

pub use index::{normalize, CatalogEntry, CatalogIndex, OptionSpec};
pub use store::{
    PriceEntry, PriceTable, RawCatalogItem, RawWingItem, StoreCatalog, StoreFile, StoreSettings,
};
