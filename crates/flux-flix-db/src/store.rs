//! Backend-agnostic bike store.
//!
//! Uses enum dispatch instead of a trait object because async methods
//! are not dyn-compatible. The service holds one [`BikeStore`] and never
//! needs to know which backend is behind it.

use flux_flix_types::{Bike, BikeId};

use crate::bike_store::PgBikeStore;
use crate::error::DbError;
use crate::memory::MemoryBikeStore;

/// A bike store backed by memory or `PostgreSQL`.
#[derive(Clone)]
pub enum BikeStore {
    /// In-process store.
    Memory(MemoryBikeStore),
    /// `PostgreSQL` store.
    Postgres(PgBikeStore),
}

impl BikeStore {
    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::Memory(MemoryBikeStore::new())
    }

    /// Persist a new bike and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn insert(&self, name: &str) -> Result<Bike, DbError> {
        match self {
            Self::Memory(store) => Ok(store.insert(name).await),
            Self::Postgres(store) => store.insert(name).await,
        }
    }

    /// Delete every bike. Returns the number of records removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        match self {
            Self::Memory(store) => Ok(store.delete_all().await),
            Self::Postgres(store) => store.delete_all().await,
        }
    }

    /// Return all bikes in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn find_all(&self) -> Result<Vec<Bike>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.find_all().await),
            Self::Postgres(store) => store.find_all().await,
        }
    }

    /// Look up a single bike by id. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn find_by_id(&self, id: &BikeId) -> Result<Option<Bike>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.find_by_id(id).await),
            Self::Postgres(store) => store.find_by_id(id).await,
        }
    }

    /// Return every bike whose name equals `name` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Bike>, DbError> {
        match self {
            Self::Memory(store) => Ok(store.find_by_name(name).await),
            Self::Postgres(store) => store.find_by_name(name).await,
        }
    }

    /// Count stored bikes.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend fails.
    pub async fn count(&self) -> Result<u64, DbError> {
        match self {
            Self::Memory(store) => Ok(store.count().await),
            Self::Postgres(store) => store.count().await,
        }
    }

    /// Human-readable backend name for logging.
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

impl From<MemoryBikeStore> for BikeStore {
    fn from(store: MemoryBikeStore) -> Self {
        Self::Memory(store)
    }
}

impl From<PgBikeStore> for BikeStore {
    fn from(store: PgBikeStore) -> Self {
        Self::Postgres(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_round_trip() {
        let store = BikeStore::in_memory();
        assert_eq!(store.backend_name(), "memory");

        let canyon = store.insert("Canyon").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.find_by_id(&canyon.id).await.unwrap(), Some(canyon.clone()));
        assert_eq!(store.find_by_name("Canyon").await.unwrap(), vec![canyon]);
        assert_eq!(store.delete_all().await.unwrap(), 1);
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
