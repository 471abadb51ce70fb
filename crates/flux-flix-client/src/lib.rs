//! Demo consumer for the Flux Flix bike catalog.
//!
//! [`CatalogClient`] wraps the three catalog endpoints. Event streams are
//! decoded from raw server-sent event bytes by [`sse::SseDecoder`].
//! [`demo::watch_bikes`] is the flow the binary runs: fetch all bikes, keep
//! the ones with the target name and follow their event streams.

pub mod catalog;
pub mod config;
pub mod demo;
pub mod error;
pub mod sse;

pub use catalog::{CatalogClient, EventStream};
pub use config::ClientConfig;
pub use demo::{matching_bikes, watch_bikes};
pub use error::ClientError;
