//! The authorization pipeline: extract, resolve key, verify, check permission.

use super::error::AuthResult;
use super::header::extract_bearer_token;
use super::jwks::{read_key_id, CachingKeyResolver, KeyResolver, RemoteKeyResolver};
use super::layer::RequirePermissionLayer;
use super::permissions::check_permission;
use super::types::Claims;
use super::verifier::TokenVerifier;
use crate::config::{AuthConfig, ConfigError};
use axum::http::HeaderMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors building an [`Authorizer`] from configuration.
#[derive(Debug, Error)]
pub enum AuthorizerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build key set HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Runs every stage of the pipeline for one request.
///
/// Holds only immutable configuration and the key resolver, so a single
/// instance is shared by all routes.
pub struct Authorizer {
    resolver: Arc<dyn KeyResolver>,
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(resolver: Arc<dyn KeyResolver>, verifier: TokenVerifier) -> Self {
        Self { resolver, verifier }
    }

    /// Build the pipeline described by the `[auth]` configuration section.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthorizerError> {
        let algorithms = config.parsed_algorithms()?;
        let verifier = TokenVerifier::new(&config.audience, &config.issuer(), &algorithms);

        let remote = RemoteKeyResolver::new(config.jwks_url(), config.jwks_timeout())?;
        let resolver: Arc<dyn KeyResolver> = match config.jwks_cache_ttl() {
            Some(ttl) => {
                info!(jwks_url = %remote.jwks_url(), ttl_secs = ttl.as_secs(), "Caching signing keys");
                Arc::new(CachingKeyResolver::new(remote, ttl))
            }
            None => {
                info!(jwks_url = %remote.jwks_url(), "Signing keys fetched on every request");
                Arc::new(remote)
            }
        };

        Ok(Self::new(resolver, verifier))
    }

    /// Authenticate the caller: returns claims only once the token has been
    /// fully verified.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthResult<Claims> {
        let token = extract_bearer_token(headers)?;
        let kid = read_key_id(token)?;
        let key = self.resolver.resolve(&kid).await?;
        let claims = self.verifier.verify(token, &key)?;
        debug!(kid = %kid, sub = ?claims.sub, "Token verified");
        Ok(claims)
    }

    /// Authenticate the caller and require `permission`.
    pub async fn authorize(&self, headers: &HeaderMap, permission: &str) -> AuthResult<Claims> {
        let claims = self.authenticate(headers).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }

    /// Layer that guards a handler with `permission`.
    pub fn require(self: &Arc<Self>, permission: impl Into<Arc<str>>) -> RequirePermissionLayer {
        RequirePermissionLayer::new(self.clone(), permission)
    }
}
