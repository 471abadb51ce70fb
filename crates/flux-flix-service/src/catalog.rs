//! Catalog service: the three read operations behind the HTTP API.
//!
//! [`CatalogService`] is a thin layer over the [`BikeStore`] and the event
//! generator. It holds no per-request state and is cheap to clone.

use std::time::Duration;

use flux_flix_db::{BikeStore, DbError};
use flux_flix_types::{Bike, BikeId};
use tokio_util::sync::CancellationToken;

use crate::events::{BikeEventStream, EventClock, spawn_event_stream};

/// Catalog operations over a bike store.
#[derive(Clone)]
pub struct CatalogService {
    store: BikeStore,
    clock: EventClock,
    event_interval: Duration,
    shutdown: CancellationToken,
}

impl CatalogService {
    /// Create a catalog over `store` whose event streams tick every
    /// `event_interval`.
    pub fn new(store: BikeStore, event_interval: Duration) -> Self {
        Self {
            store,
            clock: EventClock::System,
            event_interval,
            shutdown: CancellationToken::new(),
        }
    }

    /// Stamp events with `clock` instead of the system clock.
    #[must_use]
    pub const fn with_clock(mut self, clock: EventClock) -> Self {
        self.clock = clock;
        self
    }

    /// Use `token` to stop all event streams instead of a private one.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// All bikes in store order. Empty when the store is empty.
    pub async fn list_all(&self) -> Result<Vec<Bike>, DbError> {
        self.store.find_all().await
    }

    /// A single bike, or `None` when no bike has this id. Any string is a
    /// valid id to look up.
    pub async fn get_by_id(&self, id: &BikeId) -> Result<Option<Bike>, DbError> {
        self.store.find_by_id(id).await
    }

    /// Bikes whose name matches `name` exactly.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Bike>, DbError> {
        self.store.find_by_name(name).await
    }

    /// Open an event stream for `bike_id`.
    ///
    /// The id is not looked up: streaming an unknown bike is allowed.
    pub fn stream_events(&self, bike_id: BikeId) -> BikeEventStream {
        spawn_event_stream(
            bike_id,
            self.event_interval,
            self.clock,
            self.shutdown.clone(),
        )
    }

    /// The underlying store.
    pub const fn store(&self) -> &BikeStore {
        &self.store
    }

    /// The token that ends every event stream opened by this catalog.
    pub const fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Interval between events.
    pub const fn event_interval(&self) -> Duration {
        self.event_interval
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt;

    use super::*;

    async fn catalog_with(names: &[&str]) -> CatalogService {
        let store = BikeStore::in_memory();
        for name in names {
            store.insert(name).await.unwrap();
        }
        CatalogService::new(store, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn list_all_on_empty_store_is_empty() {
        let catalog = catalog_with(&[]).await;
        assert!(catalog.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_unknown_is_none() {
        let catalog = catalog_with(&["Canyon"]).await;
        assert_eq!(catalog.get_by_id(&BikeId::new()).await.unwrap(), None);
        assert_eq!(catalog.get_by_id(&BikeId::from("abc")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_by_id_returns_listed_record() {
        let catalog = catalog_with(&["Canyon", "Giant"]).await;
        let giant = catalog.list_all().await.unwrap().pop().unwrap();
        assert_eq!(catalog.get_by_id(&giant.id).await.unwrap(), Some(giant));
    }

    #[tokio::test]
    async fn find_by_name_filters() {
        let catalog = catalog_with(&["Canyon", "Giant", "Canyon"]).await;
        assert_eq!(catalog.find_by_name("Canyon").await.unwrap().len(), 2);
        assert!(catalog.find_by_name("Brompton").await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stream_events_does_not_require_existing_bike() {
        let catalog = catalog_with(&[]).await;
        let unknown = BikeId::from("507f1f77bcf86cd799439011");

        let event = catalog.stream_events(unknown.clone()).next().await.unwrap();
        assert_eq!(event.bike_id, unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn shared_shutdown_token_ends_streams() {
        let token = CancellationToken::new();
        let catalog = catalog_with(&[]).await.with_shutdown(token.clone());
        let mut stream = catalog.stream_events(BikeId::new());

        token.cancel();
        assert!(stream.next().await.is_none());
    }
}
