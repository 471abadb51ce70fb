//! Bike store for the Flux Flix catalog.
//!
//! The catalog keeps a single collection of [`Bike`](flux_flix_types::Bike)
//! records keyed by id. Two backends are provided:
//!
//! ```text
//! BikeStore (enum dispatch)
//!     |
//!     +-- Memory   --> MemoryBikeStore (RwLock<Vec<Bike>>, insertion order)
//!     |
//!     +-- Postgres --> PgBikeStore     (sqlx, `bikes` table ordered by seq)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`BikeStore`] dispatch enum used by the service
//! - [`memory`] -- In-process backend used by default and in tests
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`bike_store`] -- `PostgreSQL` queries over the `bikes` table
//! - [`error`] -- Shared error types

pub mod bike_store;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use bike_store::{BikeRow, PgBikeStore};
pub use error::DbError;
pub use memory::MemoryBikeStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::BikeStore;
