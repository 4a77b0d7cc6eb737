//! Catalog loading adapters.

mod yaml_loader;

pub use yaml_loader::{load_store_file, StoreLoadError};
