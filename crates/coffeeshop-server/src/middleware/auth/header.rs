//! Bearer token extraction from request headers.

use super::error::{AuthError, AuthResult};
use axum::http::{header, HeaderMap};

/// Pull the raw bearer token out of the `Authorization` header.
///
/// The value must split on whitespace into exactly two parts, the first of
/// which is `bearer` in any letter case.
pub fn extract_bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?;

    if value.is_empty() {
        return Err(AuthError::AuthorizationHeaderMissing);
    }

    let value = value.to_str().map_err(|_| AuthError::InvalidHeaderFormat)?;

    let mut parts = value.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::InvalidHeaderFormat),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeaderScheme);
    }

    Ok(token)
}
