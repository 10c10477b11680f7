use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use beerstock_core::BeerId;
use beerstock_inventory::{Beer, NewBeer};

use super::r#trait::{BeerStore, StoreError};

/// In-memory beer store for tests/dev.
///
/// Identifiers come from a monotonically increasing counter starting at 1 and
/// are never reused after a delete. Names are kept unique like the `UNIQUE`
/// column of the Postgres table.
#[derive(Debug)]
pub struct InMemoryBeerStore {
    inner: RwLock<BTreeMap<BeerId, Beer>>,
    next_id: AtomicI64,
}

impl InMemoryBeerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn name_taken(map: &BTreeMap<BeerId, Beer>, name: &str, except: Option<BeerId>) -> bool {
        map.values()
            .any(|b| b.name == name && Some(b.id) != except)
    }
}

impl Default for InMemoryBeerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl BeerStore for InMemoryBeerStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|b| b.name == name).cloned())
    }

    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Beer>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if Self::name_taken(&map, &beer.name, None) {
            return Err(StoreError::Conflict(format!(
                "name '{}' is already stored",
                beer.name
            )));
        }

        let raw = self.next_id.fetch_add(1, Ordering::SeqCst);
        let id = BeerId::new(raw).map_err(|e| StoreError::Backend(e.to_string()))?;
        let stored = beer.with_id(id);
        map.insert(id, stored.clone());
        Ok(stored)
    }

    async fn save(&self, beer: Beer) -> Result<Beer, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if Self::name_taken(&map, &beer.name, Some(beer.id)) {
            return Err(StoreError::Conflict(format!(
                "name '{}' is already stored",
                beer.name
            )));
        }
        map.insert(beer.id, beer.clone());
        Ok(beer)
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&id);
        Ok(())
    }
}
