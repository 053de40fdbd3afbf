//! Health check routes.

use crate::db::check_health;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::time::Duration;

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let db = check_health(&state.pool, Duration::from_secs(2)).await;

    let status = if db.is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if db.is_healthy { "ready" } else { "unavailable" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": {
                    "healthy": db.is_healthy,
                    "latency_ms": db.latency_ms,
                    "message": db.message,
                }
            }
        })),
    )
}
