//! Database migration utilities.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let pending = pending_migrations(pool).await?;
    if pending.is_empty() {
        debug!("Database schema is up to date");
    } else {
        info!(pending = ?pending, "Running database migrations...");
    }

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;

    info!("Migrations completed");
    Ok(())
}

/// Names of migrations that have not been applied yet.
pub async fn pending_migrations(pool: &SqlitePool) -> Result<Vec<String>> {
    use sqlx::migrate::Migrate;

    let migrator = sqlx::migrate!("./migrations");
    let mut conn = pool.acquire().await.context("Failed to acquire connection")?;
    conn.ensure_migrations_table()
        .await
        .context("Failed to prepare migrations table")?;
    let applied = conn
        .list_applied_migrations()
        .await
        .context("Failed to check applied migrations")?;

    Ok(migrator
        .iter()
        .filter(|m| !applied.iter().any(|a| a.version == m.version))
        .map(|m| format!("{}_{}", m.version, m.description))
        .collect())
}
