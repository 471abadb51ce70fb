//! Store errors. Only the `PostgreSQL` backend produces them.

/// Failure reported by a [`BikeStore`](crate::BikeStore) operation.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A query or connection failed.
    #[error("bike database error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// The `bikes` schema could not be created or upgraded.
    #[error("bike schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Connection settings were unusable.
    #[error("bike database config: {0}")]
    Config(String),
}
