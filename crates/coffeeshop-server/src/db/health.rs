//! Database health monitoring.

use sqlx::SqlitePool;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Database health status.
#[derive(Debug, Clone)]
pub struct DbHealth {
    pub is_healthy: bool,
    pub latency_ms: u64,
    pub message: Option<String>,
}

/// Check database health.
pub async fn check_health(pool: &SqlitePool, timeout: Duration) -> DbHealth {
    let start = Instant::now();

    let result = tokio::time::timeout(timeout, sqlx::query("SELECT 1").fetch_one(pool)).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let message = match result {
        Ok(Ok(_)) => {
            debug!(latency_ms, "Database health check passed");
            None
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Database health check failed");
            Some(e.to_string())
        }
        Err(_) => {
            warn!("Database health check timed out");
            Some("Connection timeout".to_string())
        }
    };

    DbHealth {
        is_healthy: message.is_none(),
        latency_ms,
        message,
    }
}
