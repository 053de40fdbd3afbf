//! Token signature and claim verification.

use super::error::{AuthError, AuthResult};
use super::types::{Claims, SigningKey};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing::debug;

/// Verifies tokens against a resolved RSA key.
#[derive(Clone)]
pub struct TokenVerifier {
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier accepting only `algorithms` and requiring the given
    /// audience and issuer.
    ///
    /// Every algorithm must belong to the RSA family; configuration
    /// validation rejects anything else before this is reached.
    pub fn new(audience: &str, issuer: &str, algorithms: &[Algorithm]) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = algorithms.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        Self { validation }
    }

    /// Verify `token` with `key` and return its claims.
    pub fn verify(&self, token: &str, key: &SigningKey) -> AuthResult<Claims> {
        if key.kty != "RSA" {
            debug!(kid = %key.kid, kty = %key.kty, "Resolved key is not an RSA key");
            return Err(AuthError::TokenVerificationFailed);
        }

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e).map_err(|err| {
            debug!(kid = %key.kid, error = %err, "Resolved key material is unusable");
            AuthError::TokenVerificationFailed
        })?;

        let token_data = decode::<serde_json::Value>(token, &decoding_key, &self.validation)
            .map_err(|err| map_decode_error(err.kind()))?;

        // Standard claims are validated above; this only rejects a payload whose
        // claims have the wrong shape, e.g. a non-list `permissions`.
        serde_json::from_value(token_data.claims).map_err(|err| {
            debug!(error = %err, "Verified token carries malformed claims");
            AuthError::InvalidClaims
        })
    }
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
        other => {
            debug!(error = ?other, "Token failed verification");
            AuthError::TokenVerificationFailed
        }
    }
}
