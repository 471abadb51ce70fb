//! `PostgreSQL` operations on the `bikes` table.
//!
//! Ids are opaque `TEXT`. New ones are generated app-side (UUID v7) so an
//! insert never needs a round-trip to learn its key. Listing is ordered by the `seq` column,
//! which records insertion order.

use flux_flix_types::{Bike, BikeId};
use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::PostgresPool;

/// Operations on the `bikes` table.
#[derive(Clone)]
pub struct PgBikeStore {
    pool: PgPool,
}

impl PgBikeStore {
    /// Create a new bike store sharing the given connection pool.
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    /// Persist a new bike and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn insert(&self, name: &str) -> Result<Bike, DbError> {
        let id = BikeId::new();

        sqlx::query(r"INSERT INTO bikes (id, name) VALUES ($1, $2)")
            .bind(id.as_str())
            .bind(name)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%id, name, "Inserted bike");

        Ok(Bike {
            id,
            name: name.to_owned(),
        })
    }

    /// Delete every bike. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the delete fails.
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        let result = sqlx::query(r"DELETE FROM bikes")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Return all bikes in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_all(&self) -> Result<Vec<Bike>, DbError> {
        let rows = sqlx::query_as::<_, BikeRow>(r"SELECT id, name FROM bikes ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Bike::from).collect())
    }

    /// Look up a single bike by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails. A missing row is
    /// `Ok(None)`.
    pub async fn find_by_id(&self, id: &BikeId) -> Result<Option<Bike>, DbError> {
        let row = sqlx::query_as::<_, BikeRow>(r"SELECT id, name FROM bikes WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Bike::from))
    }

    /// Return every bike whose name equals `name` exactly, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Bike>, DbError> {
        let rows = sqlx::query_as::<_, BikeRow>(
            r"SELECT id, name FROM bikes WHERE name = $1 ORDER BY seq",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Bike::from).collect())
    }

    /// Count stored bikes.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn count(&self) -> Result<u64, DbError> {
        let (count,): (i64,) = sqlx::query_as(r"SELECT COUNT(*) FROM bikes")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// A row from the `bikes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BikeRow {
    /// Primary key.
    pub id: String,
    /// Bike name.
    pub name: String,
}

impl From<BikeRow> for Bike {
    fn from(row: BikeRow) -> Self {
        Self {
            id: BikeId::from(row.id),
            name: row.name,
        }
    }
}
