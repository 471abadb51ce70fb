//! Axum router construction for the catalog API.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the catalog server.
///
/// The router includes:
/// - `GET /bikes` -- list bikes
/// - `GET /bikes/{id}` -- single bike
/// - `GET /bikes/{id}/events` -- server-sent event stream
///
/// CORS allows any origin so browser `EventSource` clients can connect
/// from another host.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bikes", get(handlers::list_bikes))
        .route("/bikes/{id}", get(handlers::get_bike))
        .route("/bikes/{id}/events", get(handlers::bike_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
