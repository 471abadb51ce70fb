//! HTTP endpoint handlers for the catalog server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/bikes` | List all bikes (`?name=` narrows to an exact name) |
//! | `GET` | `/bikes/{id}` | Single bike, 404 when absent |
//! | `GET` | `/bikes/{id}/events` | `text/event-stream` of bike events |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, Sse};
use flux_flix_types::{Bike, BikeId};
use futures::{Stream, StreamExt};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the `GET /bikes` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct BikesQuery {
    /// Only return bikes with exactly this name.
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// GET /bikes -- list bikes
// ---------------------------------------------------------------------------

/// List every bike in store order. An empty store yields `[]`.
pub async fn list_bikes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BikesQuery>,
) -> Result<Json<Vec<Bike>>, ApiError> {
    let bikes = match params.name.as_deref() {
        Some(name) => state.catalog.find_by_name(name).await?,
        None => state.catalog.list_all().await?,
    };
    Ok(Json(bikes))
}

// ---------------------------------------------------------------------------
// GET /bikes/{id} -- single bike
// ---------------------------------------------------------------------------

/// Return one bike by id. Ids are opaque: an unknown id is a 404.
pub async fn get_bike(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BikeId>,
) -> Result<Json<Bike>, ApiError> {
    state
        .catalog
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("bike {id}")))
}

// ---------------------------------------------------------------------------
// GET /bikes/{id}/events -- server-sent event stream
// ---------------------------------------------------------------------------

/// Stream one JSON-encoded bike event per interval until the client
/// disconnects. Any id is accepted; the bike does not have to exist.
pub async fn bike_events(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BikeId>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!(bike_id = %id, "Opening event stream");

    let events = state
        .catalog
        .stream_events(id)
        .map(|event| Event::default().json_data(&event));

    Sse::new(events)
}
