//! Persistence layer: the process-scoped database client, models, and
//! repositories.

pub mod client;
pub mod models;
pub mod repositories;

pub use client::{DbError, DbRegistry, ExecutionMode, PgClient, PgClientFactory, PgRegistry};

pub type DbPool = sqlx::PgPool;

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
