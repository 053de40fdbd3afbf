//! Database pool management.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tracing::info;

/// Create a database connection pool.
///
/// In-memory databases get a single connection that never expires, otherwise
/// the schema would vanish with the connection that created it.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    info!("Creating database connection pool...");

    let connect_options = SqliteConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout());

    pool_options = if config.is_in_memory() {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
    };

    let pool = pool_options
        .connect_with(connect_options)
        .await
        .context("Failed to create database pool")?;

    verify_connection(&pool).await?;

    info!(
        max_connections = pool.options().get_max_connections(),
        in_memory = config.is_in_memory(),
        "Database pool created"
    );

    Ok(pool)
}

/// Verify database connection.
pub async fn verify_connection(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Database connection verification failed")?;

    Ok(())
}
