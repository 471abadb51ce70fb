//! Startup fixture load.
//!
//! Replaces the store contents with a fixed list of bikes. `main` calls
//! [`seed_bikes`] once, before the server starts accepting requests.

use flux_flix_db::{BikeStore, DbError};
use flux_flix_types::Bike;
use tracing::info;

/// Delete every bike, insert `names` in order, then read back and log the
/// full collection.
///
/// Inserts run one after another so the stored order is the order of
/// `names`. Any store failure aborts the seed and is returned as-is.
pub async fn seed_bikes<S: AsRef<str>>(
    store: &BikeStore,
    names: &[S],
) -> Result<Vec<Bike>, DbError> {
    let removed = store.delete_all().await?;
    info!(removed, backend = store.backend_name(), "Cleared bike store");

    for name in names {
        store.insert(name.as_ref()).await?;
    }

    let bikes = store.find_all().await?;
    for bike in &bikes {
        info!(id = %bike.id, name = %bike.name, "Seeded bike");
    }

    Ok(bikes)
}
