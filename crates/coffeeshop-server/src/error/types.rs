//! API error types.

use crate::middleware::auth::AuthError;
use axum::http::StatusCode;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error enum covering all error cases.
#[derive(Debug, Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("bad request")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("unauthorized")]
    Unauthorized,

    // 404 Not Found
    #[error("resource not found")]
    NotFound(String),

    // 405 Method Not Allowed
    #[error("method not allowed")]
    MethodNotAllowed,

    // 422 Unprocessable Entity
    #[error("unprocessable")]
    UnprocessableEntity(String),

    // 500 Internal Server Error
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),

    #[error("internal server error")]
    Database(#[source] sqlx::Error),

    // Authorization pipeline rejection, rendered with its own body.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => err.status_code(),
        }
    }

    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::UnprocessableEntity(_) => "unprocessable_entity",
            Self::Internal(_) => "internal_error",
            Self::Database(_) => "database_error",
            Self::Auth(err) => err.error_code(),
        }
    }

    /// Extra detail shown next to the generic message, when there is any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::BadRequest(detail)
            | Self::NotFound(detail)
            | Self::UnprocessableEntity(detail) => Some(detail.clone()),
            Self::Internal(err) if cfg!(debug_assertions) => Some(format!("{err:#}")),
            Self::Database(err) if cfg!(debug_assertions) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Check if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}
