//! Authentication extractors for handlers.

use super::types::Claims;
use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extractor for the claims verified by
/// [`RequirePermissionLayer`](super::layer::RequirePermissionLayer).
///
/// Only valid on handlers wrapped by that layer; anywhere else it rejects
/// with 401.
pub struct Auth(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Auth)
            .ok_or(ApiError::Unauthorized)
    }
}
