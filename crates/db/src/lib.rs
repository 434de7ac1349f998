//! Lodgia persistence layer.
//!
//! Entity models, per-table repositories over a shared [`sqlx::PgPool`],
//! and the pool/migration plumbing the API binary consumes at startup.
//!
//! The reservations table is the atomic boundary for the booking
//! invariant: a partial exclusion constraint over
//! `(property_id, daterange(check_in, check_out))` rejects overlapping
//! active stays at write time, so two concurrent bookings of the same
//! slot resolve to exactly one winner regardless of what the
//! application-level availability pre-check saw.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod models;
pub mod repositories;

/// Shared connection pool type used across all repositories.
pub type DbPool = PgPool;

/// Default maximum pool size.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a connection before surfacing a retryable
/// timeout to the caller.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the application connection pool.
///
/// Pool size is configurable via `DATABASE_MAX_CONNECTIONS` (default 10).
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by startup and the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Database migrations up to date");
    Ok(())
}

/// Whether a sqlx error is the reservations no-overlap exclusion
/// constraint firing (SQLSTATE 23P01). This is the losing side of a
/// booking race and maps to the domain's range-unavailable error.
pub fn is_overlap_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23P01")
                && db_err.constraint() == Some("ex_reservations_no_overlap")
        }
        _ => false,
    }
}

/// Whether a sqlx error is a unique-constraint violation (SQLSTATE
/// 23505) on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}

/// Whether a sqlx error is worth retrying with the same idempotency key
/// (connection-level failure or pool exhaustion, not a data error).
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed
    )
}
