//! Shared application state.

use crate::config::ServerConfig;
use crate::db::{create_pool, run_migrations, DrinkRepository};
use crate::middleware::Authorizer;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub drinks: DrinkRepository,
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    /// Connect to the database, migrate it and build the authorizer.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let pool = create_pool(&config.database).await?;
        run_migrations(&pool).await?;

        let authorizer =
            Authorizer::from_config(&config.auth).context("Failed to build authorizer")?;

        let state = Self::from_parts(pool, Arc::new(authorizer));

        if config.database.reset_on_start {
            info!("Resetting drink menu on start");
            state
                .drinks
                .reset()
                .await
                .context("Failed to reset drink menu")?;
        }

        Ok(state)
    }

    /// Assemble state from an existing pool and authorizer.
    pub fn from_parts(pool: SqlitePool, authorizer: Arc<Authorizer>) -> Self {
        Self {
            drinks: DrinkRepository::new(pool.clone()),
            pool,
            authorizer,
        }
    }
}
