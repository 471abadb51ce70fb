//! Catalog records.
//!
//! [`Bike`] is the only persisted entity. [`BikeEvent`] is built fresh on
//! every tick of an event stream and is never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::BikeId;

/// A bike in the catalog.
///
/// A `Bike` only exists once it has been persisted: the store assigns the
/// id on insert, so there is no "unsaved" state to represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bike {
    /// Store-assigned unique identifier.
    pub id: BikeId,
    /// Display name, e.g. `Trek SL5`.
    pub name: String,
}

impl core::fmt::Display for Bike {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Bike(id={}, name={})", self.id, self.name)
    }
}

/// A single tick of a bike's event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeEvent {
    /// The bike the stream was opened for.
    pub bike_id: BikeId,
    /// When this event was produced (not when the stream was opened).
    pub date_released: DateTime<Utc>,
}

impl BikeEvent {
    /// Build an event for `bike_id` stamped with `date_released`.
    pub const fn new(bike_id: BikeId, date_released: DateTime<Utc>) -> Self {
        Self {
            bike_id,
            date_released,
        }
    }
}

impl core::fmt::Display for BikeEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "BikeEvent(bikeId={}, dateReleased={})",
            self.bike_id,
            self.date_released.to_rfc3339()
        )
    }
}
