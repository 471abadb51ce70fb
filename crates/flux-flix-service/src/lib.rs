//! Bike catalog service for Flux Flix.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **REST endpoints** for the bike catalog (`GET /bikes`,
//!   `GET /bikes/{id}`)
//! - **Server-sent event stream** (`GET /bikes/{id}/events`) that emits a
//!   freshly stamped [`BikeEvent`](flux_flix_types::BikeEvent) once per
//!   configured interval for as long as the client stays connected
//!
//! # Architecture
//!
//! ```text
//! main
//!  |-- ServiceConfig::load      (YAML + env overrides)
//!  |-- startup::open_store      (memory or PostgreSQL)
//!  |-- seed::seed_bikes         (explicit, once)
//!  +-- server::start_server
//!        +-- router --> handlers --> CatalogService --> BikeStore
//!                                          +--> events::spawn_event_stream
//! ```
//!
//! Every event subscription owns its own timer task. The task stops as
//! soon as the HTTP client goes away or the server begins shutting down.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod router;
pub mod seed;
pub mod server;
pub mod startup;
pub mod state;

// Re-export primary types for convenience.
pub use catalog::CatalogService;
pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use events::{BikeEventStream, EventClock};
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::{StartupError, open_store, spawn_server};
pub use state::AppState;
