//! Store file loader.
//!
//! Reads and validates the store YAML (catalog, settings, price table).
//! A missing or empty catalog is fatal: the caller must refuse to start
//! conversations against a menu that can never match.

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::catalog::StoreFile;

/// Errors raised while loading the store file.
#[derive(Debug, Error)]
pub enum StoreLoadError {
    #[error("Cannot read store file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file '{path}' is not valid YAML: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Store file '{path}' has an empty catalog")]
    EmptyCatalog { path: String },
}

/// Loads and validates the store file from disk.
pub fn load_store_file(path: impl AsRef<Path>) -> Result<StoreFile, StoreLoadError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| StoreLoadError::Io {
        path: path_str.clone(),
        source,
    })?;

    let store: StoreFile =
        serde_yaml::from_str(&content).map_err(|source| StoreLoadError::Parse {
            path: path_str.clone(),
            source,
        })?;

    if store.catalog.is_empty() {
        return Err(StoreLoadError::EmptyCatalog { path: path_str });
    }

    info!(
        path = %path_str,
        pizzas = store.catalog.pizzas.values().map(|g| g.len()).sum::<usize>(),
        sides = store.catalog.sides.len(),
        beverages = store.catalog.beverages.len(),
        wings = store.catalog.wings.len(),
        "store file loaded"
    );
    Ok(store)
}
