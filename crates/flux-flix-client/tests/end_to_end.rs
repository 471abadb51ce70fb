//! End-to-end tests: the client against a real catalog server bound to an
//! ephemeral port.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use flux_flix_client::{CatalogClient, ClientError, watch_bikes};
use flux_flix_db::BikeStore;
use flux_flix_service::config::{DEFAULT_BIKE_NAMES, ServerSettings};
use flux_flix_service::seed::seed_bikes;
use flux_flix_service::{AppState, CatalogService, spawn_server};
use futures::StreamExt;

/// A seeded server plus a client pointed at it.
struct Harness {
    client: CatalogClient,
    state: Arc<AppState>,
}

impl Harness {
    async fn start() -> Self {
        let store = BikeStore::in_memory();
        seed_bikes(&store, &DEFAULT_BIKE_NAMES).await.unwrap();
        let catalog = CatalogService::new(store, Duration::from_millis(50));
        let state = Arc::new(AppState::new(catalog));

        let settings = ServerSettings {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };
        let (addr, _handle) = spawn_server(&settings, Arc::clone(&state)).await.unwrap();

        Self {
            client: CatalogClient::new(format!("http://{addr}/bikes")),
            state,
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.state.shutdown().cancel();
    }
}

#[tokio::test]
async fn lists_and_fetches_seeded_bikes() {
    let harness = Harness::start().await;

    let bikes = harness.client.list_bikes().await.unwrap();
    let names: Vec<&str> = bikes.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, DEFAULT_BIKE_NAMES);

    let fetched = harness.client.get_bike(&bikes[2].id).await.unwrap();
    assert_eq!(fetched.as_ref(), Some(&bikes[2]));

    let found = harness.client.find_by_name("Trek SL5").await.unwrap();
    assert_eq!(found, vec![bikes[1].clone()]);
}

#[tokio::test]
async fn unknown_bike_is_none() {
    let harness = Harness::start().await;
    let missing = flux_flix_types::BikeId::new();
    assert_eq!(harness.client.get_bike(&missing).await.unwrap(), None);
}

#[tokio::test]
async fn watching_canyon_yields_its_events() {
    let harness = Harness::start().await;
    let canyon = harness.client.find_by_name("Canyon").await.unwrap()[0].clone();

    let events: Vec<_> = watch_bikes(&harness.client, "canyon")
        .await
        .unwrap()
        .take(3)
        .collect()
        .await;

    assert_eq!(events.len(), 3);
    let events: Vec<_> = events.into_iter().map(Result::unwrap).collect();
    assert!(events.iter().all(|e| e.bike_id == canyon.id));
    for pair in events.windows(2) {
        assert!(pair[1].date_released > pair[0].date_released);
    }
}

#[tokio::test]
async fn foreign_ids_are_fetched_and_streamed() {
    let harness = Harness::start().await;
    let foreign = flux_flix_types::BikeId::from("507f1f77bcf86cd799439011");

    assert_eq!(harness.client.get_bike(&foreign).await.unwrap(), None);

    let mut events = harness.client.stream_events(&foreign).await.unwrap();
    let event = events.next().await.unwrap().unwrap();
    assert_eq!(event.bike_id, foreign);

    let spaced = flux_flix_types::BikeId::from("trek sl5");
    let mut events = harness.client.stream_events(&spaced).await.unwrap();
    assert_eq!(events.next().await.unwrap().unwrap().bike_id.as_str(), "trek sl5");
}

#[tokio::test]
async fn watching_an_absent_name_ends_immediately() {
    let harness = Harness::start().await;
    let mut events = watch_bikes(&harness.client, "Brompton").await.unwrap();
    assert!(events.next().await.is_none());
}

#[tokio::test]
async fn shutdown_closes_client_streams() {
    let harness = Harness::start().await;
    let canyon = harness.client.find_by_name("Canyon").await.unwrap()[0].clone();
    let mut events = harness.client.stream_events(&canyon.id).await.unwrap();

    events.next().await.unwrap().unwrap();
    harness.state.shutdown().cancel();

    let end = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(item) = events.next().await {
            if item.is_err() {
                break;
            }
        }
    })
    .await;
    assert!(end.is_ok(), "stream did not end after shutdown");
}

#[tokio::test]
async fn invalid_base_url_status_is_reported() {
    let harness = Harness::start().await;
    let base = harness.client.base_url().trim_end_matches("/bikes").to_owned();
    let wrong = CatalogClient::new(format!("{base}/cycles"));

    let err = wrong.list_bikes().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
}
