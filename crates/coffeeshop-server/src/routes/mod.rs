//! Route configuration for the coffee shop API server.

mod drinks;
mod internal;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::middleware::cors_layer;
use crate::state::AppState;
use axum::{
    http::{header, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;

/// Create the main application router.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let common_middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.cors));

    Router::new()
        .merge(drinks::router(&state))
        .merge(internal::router())
        .fallback(fallback_handler)
        .layer(map_response(json_method_not_allowed))
        .layer(common_middleware)
        .with_state(state)
}

async fn fallback_handler() -> ApiError {
    ApiError::NotFound("no route matches this path".into())
}

/// Give axum's bare 405 responses the standard JSON error body.
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");

    ApiError::Internal(anyhow::anyhow!("handler panicked")).into_response()
}
