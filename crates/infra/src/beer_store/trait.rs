use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use beerstock_core::BeerId;
use beerstock_inventory::{Beer, NewBeer};

/// Infrastructure failure raised by a `BeerStore`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. concurrent insert of the same name).
    #[error("store conflict: {0}")]
    Conflict(String),

    /// The backend failed (connection, lock poisoning, malformed row, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Record store for beers.
///
/// The store holds no business rules. `insert` assigns the identifier of a new
/// record; `save` replaces an existing record wholesale. Listing order is
/// store-defined and callers must not depend on it.
#[async_trait]
pub trait BeerStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError>;

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError>;

    /// Persist a new beer and return it with its assigned identifier.
    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError>;

    /// Replace the stored record with the same identifier.
    async fn save(&self, beer: Beer) -> Result<Beer, StoreError>;

    /// Remove the record. Removing an absent id is not an error.
    async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> BeerStore for Arc<S>
where
    S: BeerStore + ?Sized,
{
    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        (**self).find_all().await
    }

    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        (**self).insert(beer).await
    }

    async fn save(&self, beer: Beer) -> Result<Beer, StoreError> {
        (**self).save(beer).await
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }
}
