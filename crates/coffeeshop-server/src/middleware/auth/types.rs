//! Authentication types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Verified token claims handed to protected handlers.
///
/// Only ever built by [`TokenVerifier`](super::verifier::TokenVerifier) once
/// the signature, issuer, audience and expiry have all been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer URL.
    pub iss: String,
    /// Intended audience(s).
    pub aud: Audience,
    /// Expiration timestamp.
    pub exp: i64,
    /// Subject (caller identity at the issuer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Granted permission strings, e.g. `post:drinks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<String>>,
    /// Any other claims carried by the token.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Check if the token grants a permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .map(|granted| granted.contains(permission))
            .unwrap_or(false)
    }
}

/// The `aud` claim, which issuers send either as a string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::Single(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// RSA public key material selected from the discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    /// Key type, `RSA` for every key this service can use.
    pub kty: String,
    /// Key identifier.
    pub kid: String,
    /// Intended key use, usually `sig`.
    #[serde(rename = "use")]
    pub usage: String,
    /// Modulus (base64url).
    pub n: String,
    /// Exponent (base64url).
    pub e: String,
}

/// A signing key set as published at `/.well-known/jwks.json`.
///
/// Entries are kept loose so that keys this service cannot use (EC keys,
/// encryption keys) do not fail parsing of the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigningKeySet {
    #[serde(default)]
    pub keys: Vec<KeySetEntry>,
}

/// One raw entry of a [`SigningKeySet`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeySetEntry {
    #[serde(default)]
    pub kty: Option<String>,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(rename = "use", default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

impl SigningKeySet {
    /// Select the complete key whose identifier matches `kid`.
    pub fn find(&self, kid: &str) -> Option<SigningKey> {
        self.keys
            .iter()
            .filter(|entry| entry.kid.as_deref() == Some(kid))
            .find_map(|entry| {
                Some(SigningKey {
                    kty: entry.kty.clone()?,
                    kid: kid.to_string(),
                    usage: entry.usage.clone()?,
                    n: entry.n.clone()?,
                    e: entry.e.clone()?,
                })
            })
    }
}
