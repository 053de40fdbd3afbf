//! Common utilities for driving the router in integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use coffeeshop_server::{
    config::{AuthConfig, DatabaseConfig, ServerConfig},
    db::{create_pool, run_migrations},
    middleware::Authorizer,
    routes::create_router,
    AppState,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const ISSUER: &str = "https://coffeeshop.test/";
pub const AUDIENCE: &str = "coffeeshop-api";
pub const PRIMARY_KID: &str = "primary-key";
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub const PRIMARY_PEM: &str = include_str!("../fixtures/primary_rsa.pem");
pub const ROGUE_PEM: &str = include_str!("../fixtures/rogue_rsa.pem");
pub const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

/// A router wired to an in-memory database and a mock key set endpoint.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub jwks: MockServer,
}

impl TestApp {
    /// App whose key set endpoint serves the fixture keys.
    pub async fn new() -> Self {
        let jwks = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS_JSON, "application/json"))
            .mount(&jwks)
            .await;
        Self::with_key_server(jwks).await
    }

    /// App pointed at `jwks`, with whatever mocks the caller mounted.
    pub async fn with_key_server(jwks: MockServer) -> Self {
        Self::with_key_cache(jwks, None).await
    }

    /// Like [`TestApp::with_key_server`], caching keys for `ttl_secs` when set.
    pub async fn with_key_cache(jwks: MockServer, ttl_secs: Option<u64>) -> Self {
        let config = ServerConfig {
            auth: AuthConfig {
                jwks_url: Some(format!("{}{}", jwks.uri(), JWKS_PATH)),
                issuer: Some(ISSUER.to_string()),
                jwks_cache_ttl_secs: ttl_secs,
                ..AuthConfig::for_domain("coffeeshop.test", AUDIENCE)
            },
            database: DatabaseConfig::in_memory(),
            ..Default::default()
        };

        let pool = create_pool(&config.database)
            .await
            .expect("Failed to create pool");
        run_migrations(&pool).await.expect("Failed to migrate");

        let authorizer = Authorizer::from_config(&config.auth).expect("Failed to build authorizer");
        let state = AppState::from_parts(pool, Arc::new(authorizer));
        let router = create_router(state.clone(), &config);

        Self {
            router,
            state,
            jwks,
        }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send_request(request).await
    }

    /// Send a fully built request.
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Body is not JSON")
        };
        (status, body)
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims for a token that is valid for ten minutes.
pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": now() + 600,
        "iat": now(),
        "sub": "auth0|barista",
        "permissions": permissions,
    })
}

pub fn sign(payload: &Value) -> String {
    sign_with(payload, PRIMARY_KID, PRIMARY_PEM)
}

pub fn sign_with(payload: &Value, kid: &str, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(
        &header,
        payload,
        &EncodingKey::from_rsa_pem(pem.as_bytes()).expect("Invalid fixture key"),
    )
    .expect("Failed to sign token")
}

/// Signed token carrying `permissions`.
pub fn token(permissions: &[&str]) -> String {
    sign(&claims(permissions))
}

/// Token granting every drinks permission.
pub fn manager_token() -> String {
    token(&[
        "get:drinks-detail",
        "post:drinks",
        "patch:drinks",
        "delete:drinks",
    ])
}
