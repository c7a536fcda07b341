//! PostgreSQL data access for repair cases and warranty work.
//!
//! Repositories are zero-sized structs whose async methods take `&PgPool`
//! first. Case status is never stored; queries compute it with the SQL
//! rendering of the shared decision table (see [`status_expr`]).

use std::time::Duration;

use claimtrack_core::types::Date;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgExecutor;

pub mod models;
pub mod repositories;
pub mod status_expr;

pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// The database's `CURRENT_DATE`.
///
/// Case statuses are evaluated against this date everywhere: the SQL
/// rendering reads it directly and in-process callers fetch it here, so a
/// host clock or time zone never enters the computation.
pub async fn current_date<'e, E>(executor: E) -> Result<Date, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, Date>("SELECT CURRENT_DATE").fetch_one(executor).await
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Migrations up to date");
    Ok(())
}
