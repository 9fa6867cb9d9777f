use std::sync::Arc;

use anyhow::Result;
use tourstop_core::storage::FileStorage;
use tourstop_core::{Catalog, TourConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Catalog,
    config: TourConfig,
    storage: FileStorage,
}

impl AppState {
    /// Load configuration and catalog once at startup. The catalog is
    /// immutable for the lifetime of the server.
    pub fn load() -> Result<Self> {
        let config = TourConfig::load()?;
        let catalog = tourstop_core::load_catalog(&config)?;
        Ok(Self::new(catalog, config))
    }

    pub fn new(catalog: Catalog, config: TourConfig) -> Self {
        let storage = FileStorage::new(config.data_path());
        AppState {
            inner: Arc::new(Inner {
                catalog,
                config,
                storage,
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn config(&self) -> &TourConfig {
        &self.inner.config
    }

    pub fn storage(&self) -> &FileStorage {
        &self.inner.storage
    }
}
