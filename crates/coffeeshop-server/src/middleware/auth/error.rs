//! Authorization failure taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Result type for the authorization pipeline.
pub type AuthResult<T> = Result<T, AuthError>;

/// A terminal rejection raised by one of the pipeline stages.
///
/// Every variant maps to a fixed `(status, code, description)` triple. Several
/// kinds share the `invalid_header` code on the wire; the variant itself is
/// what distinguishes them in logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header was not provided")]
    AuthorizationHeaderMissing,

    #[error("Authorization header must be in the form 'Bearer <token>'")]
    InvalidHeaderFormat,

    #[error("Authorization header must use the bearer scheme")]
    InvalidHeaderScheme,

    #[error("Token header does not carry a key identifier")]
    InvalidHeader,

    #[error("Token header could not be verified")]
    KeyResolutionFailed,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token claims are invalid: check the audience and issuer")]
    InvalidClaims,

    #[error("Token could not be authenticated")]
    TokenVerificationFailed,

    #[error("Permissions not found in token payload")]
    PermissionsClaimMissing,

    #[error("Permission '{0}' is not granted by the token")]
    PermissionDenied(String),
}

/// Pipeline stage that produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Extract,
    ResolveKey,
    Verify,
    Authorize,
}

impl AuthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::ResolveKey => "resolve_key",
            Self::Verify => "verify",
            Self::Authorize => "authorize",
        }
    }
}

impl AuthError {
    /// HTTP status returned for this rejection.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthorizationHeaderMissing
            | Self::InvalidHeaderFormat
            | Self::InvalidHeaderScheme
            | Self::InvalidHeader
            | Self::KeyResolutionFailed
            | Self::TokenExpired
            | Self::InvalidClaims => StatusCode::UNAUTHORIZED,

            Self::TokenVerificationFailed | Self::PermissionsClaimMissing => {
                StatusCode::BAD_REQUEST
            }

            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Machine-readable code written to the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::InvalidHeaderFormat
            | Self::InvalidHeaderScheme
            | Self::InvalidHeader
            | Self::KeyResolutionFailed
            | Self::TokenVerificationFailed => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims | Self::PermissionsClaimMissing => "invalid_claims",
            Self::PermissionDenied(_) => "unauthorized",
        }
    }

    /// Stage of the pipeline this error belongs to.
    pub fn stage(&self) -> AuthStage {
        match self {
            Self::AuthorizationHeaderMissing
            | Self::InvalidHeaderFormat
            | Self::InvalidHeaderScheme => AuthStage::Extract,
            Self::InvalidHeader | Self::KeyResolutionFailed => AuthStage::ResolveKey,
            Self::TokenExpired | Self::InvalidClaims | Self::TokenVerificationFailed => {
                AuthStage::Verify
            }
            Self::PermissionsClaimMissing | Self::PermissionDenied(_) => AuthStage::Authorize,
        }
    }

    /// The `{code, description}` body for this error.
    pub fn body(&self) -> AuthErrorBody {
        AuthErrorBody {
            code: self.error_code(),
            description: self.to_string(),
        }
    }
}

/// Wire form of an [`AuthError`].
#[derive(Debug, Serialize)]
pub struct AuthErrorBody {
    pub code: &'static str,
    pub description: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!(
            stage = self.stage().as_str(),
            code = self.error_code(),
            error = %self,
            "Request rejected by authorization pipeline"
        );

        (self.status_code(), Json(self.body())).into_response()
    }
}
