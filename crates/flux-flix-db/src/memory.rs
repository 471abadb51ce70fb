//! In-process bike store.
//!
//! Records live in a `Vec` behind a [`tokio::sync::RwLock`], so iteration
//! order is insertion order and concurrent readers never block each other.
//! Cloning the store shares the same underlying collection.

use std::sync::Arc;

use flux_flix_types::{Bike, BikeId};
use tokio::sync::RwLock;

/// In-memory bike collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryBikeStore {
    bikes: Arc<RwLock<Vec<Bike>>>,
}

impl MemoryBikeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new bike and return it with its assigned id.
    pub async fn insert(&self, name: &str) -> Bike {
        let bike = Bike {
            id: BikeId::new(),
            name: name.to_owned(),
        };
        self.bikes.write().await.push(bike.clone());
        bike
    }

    /// Delete every bike. Returns the number of records removed.
    pub async fn delete_all(&self) -> u64 {
        let mut bikes = self.bikes.write().await;
        let removed = u64::try_from(bikes.len()).unwrap_or(u64::MAX);
        bikes.clear();
        removed
    }

    /// Return all bikes in insertion order.
    pub async fn find_all(&self) -> Vec<Bike> {
        self.bikes.read().await.clone()
    }

    /// Look up a single bike by id.
    pub async fn find_by_id(&self, id: &BikeId) -> Option<Bike> {
        self.bikes
            .read()
            .await
            .iter()
            .find(|bike| &bike.id == id)
            .cloned()
    }

    /// Return every bike whose name equals `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> Vec<Bike> {
        self.bikes
            .read()
            .await
            .iter()
            .filter(|bike| bike.name == name)
            .cloned()
            .collect()
    }

    /// Count stored bikes.
    pub async fn count(&self) -> u64 {
        u64::try_from(self.bikes.read().await.len()).unwrap_or(u64::MAX)
    }
}
