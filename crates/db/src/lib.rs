//! Persistence gateway: PostgreSQL pool, migrations, heartbeat, models,
//! and repositories.
//!
//! The pool is created once at startup and injected everywhere through
//! application state; no globals. `sqlx` owns reconnection of individual
//! pool connections; the [`heartbeat::Heartbeat`] task surfaces sustained
//! outages in the logs without crashing the process.

use std::time::Duration;

use easel_core::error::CoreError;
use easel_core::retry::{retry, RetryPolicy};
use sqlx::postgres::PgPoolOptions;

pub mod heartbeat;
pub mod models;
pub mod repositories;

pub use heartbeat::Heartbeat;

pub type DbPool = sqlx::PgPool;

/// Attempts made before giving up on the initial connection.
const CONNECT_ATTEMPTS: u32 = 5;
/// Fixed delay between connection attempts.
const CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
}

/// Create a pool and verify liveness, retrying with a fixed backoff.
///
/// Surfaces [`CoreError::Connectivity`] once the retry budget is exhausted.
/// Safe to call while the database is still starting up (the usual reason
/// for initial connection failures in containerized deployments).
pub async fn connect_with_retry(database_url: &str) -> Result<DbPool, CoreError> {
    let policy = RetryPolicy::new(CONNECT_ATTEMPTS, CONNECT_BACKOFF);
    retry(policy, "db_connect", || async {
        let pool = create_pool(database_url).await?;
        health_check(&pool).await?;
        Ok::<_, sqlx::Error>(pool)
    })
    .await
    .map_err(|e| CoreError::Connectivity(e.to_string()))
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations. Idempotent: sqlx tracks applied migrations,
/// so repeated calls (and repeated process restarts) are safe and never
/// duplicate tables or indexes.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
