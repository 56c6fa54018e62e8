//! Database Module
//!
//! PostgreSQL connection pool and embedded migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseSettings;
use crate::shared::error::AppError;

/// Create a PostgreSQL connection pool
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, AppError> {
    let url = settings
        .url
        .as_deref()
        .ok_or_else(|| AppError::Internal("database url is not configured".into()))?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout))
        .connect(url)
        .await?;

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// SQLSTATE raised by an `EXCLUDE` constraint.
pub const EXCLUSION_VIOLATION: &str = "23P01";

/// SQLSTATE raised by a foreign key constraint.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Whether `err` is a database error carrying `sqlstate`.
pub fn has_sqlstate(err: &sqlx::Error, sqlstate: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(sqlstate),
        _ => false,
    }
}
