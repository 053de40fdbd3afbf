//! Token fixtures shared by the auth unit tests.

use super::types::{SigningKey, SigningKeySet};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

pub const DOMAIN: &str = "coffeeshop.test";
pub const ISSUER: &str = "https://coffeeshop.test/";
pub const AUDIENCE: &str = "coffeeshop-api";
pub const PRIMARY_KID: &str = "primary-key";

pub const PRIMARY_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/primary_rsa.pem"
));
pub const ROGUE_PEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/rogue_rsa.pem"
));
pub const JWKS_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/jwks.json"
));

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn key_set() -> SigningKeySet {
    serde_json::from_str(JWKS_JSON).unwrap()
}

pub fn primary_key() -> SigningKey {
    key_set().find(PRIMARY_KID).unwrap()
}

pub fn sign(payload: &serde_json::Value) -> String {
    sign_with(payload, PRIMARY_KID, PRIMARY_PEM)
}

pub fn sign_with(payload: &serde_json::Value, kid: &str, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(
        &header,
        payload,
        &EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap(),
    )
    .unwrap()
}

pub fn sign_hs256(payload: &serde_json::Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());
    encode(&header, payload, &EncodingKey::from_secret(b"shared-secret")).unwrap()
}
