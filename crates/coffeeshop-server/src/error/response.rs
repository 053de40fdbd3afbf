//! Error response implementation.

use super::types::ApiError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            // Logged by the auth pipeline itself.
            ApiError::Auth(err) => return err.into_response(),
            err => err,
        };

        if err.is_server_error() {
            error!(error = ?err, code = err.error_code(), "Server error occurred");
        } else if matches!(err, ApiError::Unauthorized) {
            warn!(code = err.error_code(), "Auth error occurred");
        }

        let status = err.status_code();
        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: err.to_string(),
            detail: err.detail(),
        };

        (status, Json(body)).into_response()
    }
}

// Conversion implementations
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("record not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::UnprocessableEntity(db_err.message().to_string())
            }
            _ => ApiError::Database(err),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::NotFound(rejection.body_text())
    }
}
