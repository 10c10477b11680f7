use std::sync::Arc;

use beerstock_infra::{BeerStore, InMemoryBeerStore, PostgresBeerStore, StockManager, StoreError};

use crate::config::AppConfig;

/// Store-agnostic manager used by the HTTP handlers.
pub type DynStockManager = StockManager<Arc<dyn BeerStore>>;

/// Shared services injected into handlers as an `Extension`.
#[derive(Clone)]
pub struct AppServices {
    manager: Arc<DynStockManager>,
}

impl AppServices {
    pub fn new(store: Arc<dyn BeerStore>) -> Self {
        Self {
            manager: Arc::new(StockManager::new(store)),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBeerStore::new()))
    }

    /// Postgres when `DATABASE_URL` is configured, in-memory otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match &config.database_url {
            Some(url) => {
                let store = PostgresBeerStore::connect(url).await?;
                store.migrate().await?;
                tracing::info!("using postgres beer store");
                Ok(Self::new(Arc::new(store)))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory beer store");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn manager(&self) -> &DynStockManager {
        &self.manager
    }
}
