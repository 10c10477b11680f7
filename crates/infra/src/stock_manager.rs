//! Stock management (application-level orchestration).
//!
//! The `StockManager` sits between the HTTP layer and a [`BeerStore`]:
//!
//! ```text
//! Request
//!   ↓
//! 1. Look up the beer (by name or id)
//!   ↓
//! 2. Apply the domain rule (uniqueness, stock bounds)
//!   ↓
//! 3. Persist through the store (insert / save / delete)
//! ```
//!
//! The quantity rules live in `beerstock-inventory` (`Beer::increment`,
//! `Beer::decrement`); this module only orchestrates lookups and writes around
//! them. A rejected operation performs no write.

use thiserror::Error;
use tracing::instrument;

use beerstock_core::{BeerId, DomainError};
use beerstock_inventory::{Beer, NewBeer};

use crate::beer_store::{BeerStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StockError {
    /// No beer matches the given id or name.
    #[error("beer not found")]
    NotFound,
    /// A beer with the same name is already registered.
    #[error("{0}")]
    AlreadyExists(String),
    /// The change would leave the `[0, max]` bound.
    #[error("{0}")]
    CapacityExceeded(String),
    /// Domain validation failure (deterministic).
    #[error("{0}")]
    Validation(String),
    /// The record store failed.
    #[error(transparent)]
    Store(StoreError),
}

impl From<DomainError> for StockError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => StockError::NotFound,
            DomainError::AlreadyExists(msg) => StockError::AlreadyExists(msg),
            DomainError::CapacityExceeded(msg) => StockError::CapacityExceeded(msg),
            DomainError::Validation(msg) => StockError::Validation(msg),
            DomainError::InvalidId(msg) => StockError::Validation(msg),
        }
    }
}

impl From<StoreError> for StockError {
    fn from(value: StoreError) -> Self {
        StockError::Store(value)
    }
}

/// Business rules over a pluggable beer store.
///
/// ## Generic Parameters
///
/// - `S`: record store implementation (in-memory, Postgres, or `Arc<dyn BeerStore>`)
#[derive(Debug, Clone)]
pub struct StockManager<S> {
    store: S,
}

impl<S> StockManager<S>
where
    S: BeerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new beer. Fails with `AlreadyExists` when the name is taken.
    #[instrument(skip(self, beer), fields(name = %beer.name), err)]
    pub async fn create(&self, beer: NewBeer) -> Result<Beer, StockError> {
        if self.store.find_by_name(&beer.name).await?.is_some() {
            tracing::debug!("name already registered");
            return Err(DomainError::already_exists(format!(
                "beer with name {} already registered in the system",
                beer.name
            ))
            .into());
        }
        beer.ensure_within_capacity()?;

        let stored = match self.store.insert(beer).await {
            Ok(stored) => stored,
            // Lost a race against a concurrent insert of the same name.
            Err(StoreError::Conflict(msg)) => return Err(StockError::AlreadyExists(msg)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(id = %stored.id, "beer created");
        Ok(stored)
    }

    #[instrument(skip(self), err)]
    pub async fn find_by_name(&self, name: &str) -> Result<Beer, StockError> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or(StockError::NotFound)
    }

    /// Every stored beer in store-defined order; empty when nothing is stored.
    #[instrument(skip(self), err)]
    pub async fn list_all(&self) -> Result<Vec<Beer>, StockError> {
        Ok(self.store.find_all().await?)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_by_id(&self, id: BeerId) -> Result<(), StockError> {
        self.verify_exists(id).await?;
        self.store.delete_by_id(id).await?;
        tracing::info!(%id, "beer deleted");
        Ok(())
    }

    /// Add `amount` units. Reaching `max` exactly is allowed.
    #[instrument(skip(self), err)]
    pub async fn increment(&self, id: BeerId, amount: u32) -> Result<Beer, StockError> {
        let beer = self.verify_exists(id).await?;
        let updated = beer.increment(amount)?;
        let saved = self.store.save(updated).await?;
        tracing::info!(%id, quantity = saved.quantity, "stock incremented");
        Ok(saved)
    }

    /// Remove `amount` units. Reaching zero exactly is allowed.
    #[instrument(skip(self), err)]
    pub async fn decrement(&self, id: BeerId, amount: u32) -> Result<Beer, StockError> {
        let beer = self.verify_exists(id).await?;
        let updated = beer.decrement(amount)?;
        let saved = self.store.save(updated).await?;
        tracing::info!(%id, quantity = saved.quantity, "stock decremented");
        Ok(saved)
    }

    async fn verify_exists(&self, id: BeerId) -> Result<Beer, StockError> {
        self.store.find_by_id(id).await?.ok_or(StockError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use beerstock_inventory::BeerType;

    use super::*;
    use crate::beer_store::InMemoryBeerStore;

    /// Store wrapper that counts writes, to prove rejected operations do not persist.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryBeerStore,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BeerStore for CountingStore {
        async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
            self.inner.find_by_name(name).await
        }

        async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
            self.inner.find_all().await
        }

        async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(beer).await
        }

        async fn save(&self, beer: Beer) -> Result<Beer, StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.save(beer).await
        }

        async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_by_id(id).await
        }
    }

    /// Store whose backend is down.
    struct FailingStore;

    #[async_trait]
    impl BeerStore for FailingStore {
        async fn find_by_name(&self, _name: &str) -> Result<Option<Beer>, StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn find_by_id(&self, _id: BeerId) -> Result<Option<Beer>, StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn insert(&self, _beer: NewBeer) -> Result<Beer, StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn save(&self, _beer: Beer) -> Result<Beer, StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }

        async fn delete_by_id(&self, _id: BeerId) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection refused".to_string()))
        }
    }

    fn new_beer(name: &str, quantity: u32, max: u32) -> NewBeer {
        NewBeer {
            name: name.to_string(),
            brand: "Ambev".to_string(),
            beer_type: BeerType::Lager,
            quantity,
            max,
        }
    }

    fn setup() -> (StockManager<Arc<CountingStore>>, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (StockManager::new(store.clone()), store)
    }

    #[tokio::test]
    async fn create_returns_store_assigned_id() {
        let (manager, store) = setup();

        let created = manager.create(new_beer("Brahma", 10, 50)).await.unwrap();

        let stored = store.find_by_name("Brahma").await.unwrap().unwrap();
        assert_eq!(created, stored);
        assert_eq!(created.id.get(), 1);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn create_with_taken_name_leaves_store_unchanged() {
        let (manager, store) = setup();
        manager.create(new_beer("Brahma", 10, 50)).await.unwrap();

        let err = manager.create(new_beer("Brahma", 1, 5)).await.unwrap_err();

        assert!(matches!(err, StockError::AlreadyExists(_)));
        assert_eq!(store.writes(), 1);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
        assert_eq!(manager.find_by_name("Brahma").await.unwrap().max, 50);
    }

    #[tokio::test]
    async fn create_rejects_quantity_above_max_without_writing() {
        let (manager, store) = setup();

        let err = manager.create(new_beer("Brahma", 60, 50)).await.unwrap_err();

        assert!(matches!(err, StockError::Validation(_)));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn store_conflict_on_insert_maps_to_already_exists() {
        struct RacingStore(InMemoryBeerStore);

        #[async_trait]
        impl BeerStore for RacingStore {
            async fn find_by_name(&self, _name: &str) -> Result<Option<Beer>, StoreError> {
                // Pretend the lookup ran before a concurrent insert landed.
                Ok(None)
            }
            async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
                self.0.find_by_id(id).await
            }
            async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
                self.0.find_all().await
            }
            async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
                self.0.insert(beer).await
            }
            async fn save(&self, beer: Beer) -> Result<Beer, StoreError> {
                self.0.save(beer).await
            }
            async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError> {
                self.0.delete_by_id(id).await
            }
        }

        let manager = StockManager::new(RacingStore(InMemoryBeerStore::new()));
        manager.create(new_beer("Brahma", 1, 5)).await.unwrap();

        let err = manager.create(new_beer("Brahma", 1, 5)).await.unwrap_err();
        assert!(matches!(err, StockError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn find_by_name_of_absent_beer_is_not_found() {
        let (manager, _store) = setup();
        assert_eq!(
            manager.find_by_name("Heineken").await.unwrap_err(),
            StockError::NotFound
        );
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let (manager, _store) = setup();
        assert!(manager.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_beer_and_second_delete_is_not_found() {
        let (manager, store) = setup();
        let created = manager.create(new_beer("Brahma", 10, 50)).await.unwrap();

        manager.delete_by_id(created.id).await.unwrap();

        assert_eq!(
            manager.find_by_name("Brahma").await.unwrap_err(),
            StockError::NotFound
        );
        let writes_after_delete = store.writes();
        assert_eq!(
            manager.delete_by_id(created.id).await.unwrap_err(),
            StockError::NotFound
        );
        assert_eq!(store.writes(), writes_after_delete);
    }

    #[tokio::test]
    async fn rejected_increment_does_not_write() {
        let (manager, store) = setup();
        let created = manager.create(new_beer("Brahma", 10, 50)).await.unwrap();

        let err = manager.increment(created.id, 80).await.unwrap_err();

        assert!(matches!(err, StockError::CapacityExceeded(_)));
        assert_eq!(store.writes(), 1);
        assert_eq!(manager.find_by_name("Brahma").await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn rejected_decrement_does_not_write() {
        let (manager, store) = setup();
        let created = manager.create(new_beer("Brahma", 10, 50)).await.unwrap();

        let err = manager.decrement(created.id, 80).await.unwrap_err();

        assert!(matches!(err, StockError::CapacityExceeded(_)));
        assert_eq!(store.writes(), 1);
        assert_eq!(manager.find_by_name("Brahma").await.unwrap().quantity, 10);
    }

    #[tokio::test]
    async fn increment_and_decrement_of_absent_id_are_not_found() {
        let (manager, store) = setup();
        let missing = BeerId::new(2).unwrap();

        assert_eq!(
            manager.increment(missing, 10).await.unwrap_err(),
            StockError::NotFound
        );
        assert_eq!(
            manager.decrement(missing, 10).await.unwrap_err(),
            StockError::NotFound
        );
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let manager = StockManager::new(FailingStore);

        let err = manager.list_all().await.unwrap_err();
        assert_eq!(
            err,
            StockError::Store(StoreError::Backend("connection refused".to_string()))
        );
        assert!(matches!(
            manager.increment(BeerId::new(1).unwrap(), 1).await,
            Err(StockError::Store(_))
        ));
    }

    #[test]
    fn domain_errors_map_onto_stock_errors() {
        assert_eq!(StockError::from(DomainError::not_found()), StockError::NotFound);
        assert_eq!(
            StockError::from(DomainError::capacity_exceeded("over")),
            StockError::CapacityExceeded("over".to_string())
        );
        assert_eq!(
            StockError::from(DomainError::invalid_id("bad")),
            StockError::Validation("bad".to_string())
        );
    }
}
