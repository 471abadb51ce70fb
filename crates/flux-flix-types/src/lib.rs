//! Shared type definitions for the Flux Flix bike catalog.
//!
//! Both the catalog service and the demo client depend on this crate so
//! the wire format of a bike and of a bike event is defined exactly once.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque string identifier for bikes
//! - [`structs`] -- The persisted [`Bike`] record and the ephemeral [`BikeEvent`]

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::BikeId;
pub use structs::{Bike, BikeEvent};
