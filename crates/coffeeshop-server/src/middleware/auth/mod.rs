//! Bearer-token authorization middleware.
//!
//! A request passes four stages in order, and the first failure ends it:
//!
//! 1. [`header`]: take the token from `Authorization: Bearer <token>`.
//! 2. [`jwks`]: read the token's `kid` and resolve the issuer's public key.
//! 3. [`verifier`]: check signature, expiry, audience and issuer.
//! 4. [`permissions`]: require the route's permission in the claims.
//!
//! [`Authorizer`] runs the stages; [`RequirePermissionLayer`] wraps a handler
//! with them and [`Auth`] hands the verified [`Claims`] to the handler.

pub mod authorizer;
pub mod error;
pub mod extractor;
pub mod header;
pub mod jwks;
pub mod layer;
pub mod permissions;
pub mod types;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::{Authorizer, AuthorizerError};
pub use error::{AuthError, AuthErrorBody, AuthResult, AuthStage};
pub use extractor::Auth;
pub use header::extract_bearer_token;
pub use jwks::{
    discovery_url, read_key_id, CachingKeyResolver, KeyFetchError, KeyResolver, RemoteKeyResolver,
};
pub use layer::{RequirePermission, RequirePermissionLayer};
pub use permissions::check_permission;
pub use types::{Audience, Claims, SigningKey, SigningKeySet};
pub use verifier::TokenVerifier;
