//! Signing key resolution against the issuer's discovery document.
//!
//! The default [`RemoteKeyResolver`] downloads the whole key set on every
//! call and keeps nothing between requests. [`CachingKeyResolver`] can be
//! wrapped around any resolver to hold keys for a fixed TTL; a key id it has
//! not seen always goes back to the wrapped resolver.

use super::error::{AuthError, AuthResult};
use super::types::{SigningKey, SigningKeySet};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Source of the public key a token claims to be signed with.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    /// Resolve the key registered under `kid`.
    async fn resolve(&self, kid: &str) -> AuthResult<SigningKey>;
}

#[async_trait]
impl<R: KeyResolver + ?Sized> KeyResolver for Arc<R> {
    async fn resolve(&self, kid: &str) -> AuthResult<SigningKey> {
        (**self).resolve(kid).await
    }
}

/// Read the key identifier from the token header without trusting it.
pub fn read_key_id(token: &str) -> AuthResult<String> {
    let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::InvalidHeader)?;
    header.kid.ok_or(AuthError::InvalidHeader)
}

/// Discovery URL for an issuer domain.
pub fn discovery_url(domain: &str) -> String {
    format!("https://{}/.well-known/jwks.json", domain)
}

/// Reasons a key set download can fail. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("request to key set endpoint failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("key set endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("key set document is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Resolver that downloads the key set from the discovery URL on every call.
#[derive(Debug, Clone)]
pub struct RemoteKeyResolver {
    jwks_url: String,
    client: reqwest::Client,
}

impl RemoteKeyResolver {
    /// Create a resolver. Without a `timeout` the request runs for as long
    /// as the HTTP client allows.
    pub fn new(jwks_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            jwks_url: jwks_url.into(),
            client: builder.build()?,
        })
    }

    /// The discovery URL this resolver reads from.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Download and parse the full key set.
    pub async fn fetch_key_set(&self) -> Result<SigningKeySet, KeyFetchError> {
        debug!(jwks_url = %self.jwks_url, "Fetching signing key set");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(KeyFetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyFetchError::Status(status));
        }

        response
            .json::<SigningKeySet>()
            .await
            .map_err(KeyFetchError::Decode)
    }
}

#[async_trait]
impl KeyResolver for RemoteKeyResolver {
    async fn resolve(&self, kid: &str) -> AuthResult<SigningKey> {
        let key_set = self.fetch_key_set().await.map_err(|err| {
            warn!(jwks_url = %self.jwks_url, error = %err, "Signing key set unavailable");
            AuthError::KeyResolutionFailed
        })?;

        key_set.find(kid).ok_or_else(|| {
            warn!(jwks_url = %self.jwks_url, kid = %kid, "No signing key matches token key id");
            AuthError::KeyResolutionFailed
        })
    }
}

#[derive(Debug, Clone)]
struct CachedKey {
    key: SigningKey,
    fetched_at: Instant,
}

/// Decorator that remembers resolved keys for `ttl`.
pub struct CachingKeyResolver<R> {
    inner: R,
    ttl: Duration,
    keys: DashMap<String, CachedKey>,
}

impl<R: KeyResolver> CachingKeyResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            keys: DashMap::new(),
        }
    }

    /// Drop every cached key.
    pub fn invalidate(&self) {
        self.keys.clear();
    }

    /// Number of keys currently cached, fresh or stale.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn fresh(&self, kid: &str) -> Option<SigningKey> {
        let entry = self.keys.get(kid)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.key.clone())
        } else {
            None
        }
    }
}

#[async_trait]
impl<R: KeyResolver> KeyResolver for CachingKeyResolver<R> {
    async fn resolve(&self, kid: &str) -> AuthResult<SigningKey> {
        if let Some(key) = self.fresh(kid) {
            debug!(kid = %kid, "Using cached signing key");
            return Ok(key);
        }

        // Stale or unknown: drop the entry so a failed refetch leaves nothing behind.
        self.keys.remove(kid);

        let key = self.inner.resolve(kid).await?;
        self.keys.insert(
            kid.to_string(),
            CachedKey {
                key: key.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(key)
    }
}
