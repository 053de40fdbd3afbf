//! End-to-end behaviour of the bearer-token pipeline on the drinks routes.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::*;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// `GET /drinks-detail` with a raw `Authorization` value.
async fn detail_with_header(app: &TestApp, value: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap();
    app.send_request(request).await
}

fn assert_auth_error(response: (StatusCode, Value), status: StatusCode, code: &str) {
    let (actual_status, body) = response;
    assert_eq!(actual_status, status, "body: {body}");
    assert_eq!(body["code"], code, "body: {body}");
    assert!(body["description"].is_string(), "body: {body}");
    assert_eq!(body.as_object().unwrap().len(), 2, "body: {body}");
}

#[tokio::test]
async fn test_missing_header() {
    let app = TestApp::new().await;
    let response = app.send(Method::GET, "/drinks-detail", None, None).await;
    assert_auth_error(
        response,
        StatusCode::UNAUTHORIZED,
        "authorization_header_missing",
    );
}

#[tokio::test]
async fn test_malformed_headers() {
    let app = TestApp::new().await;

    for value in ["BearerOnly", "Bearer a b", "Basic xyz", "Token abc.def.ghi"] {
        let response = detail_with_header(&app, value).await;
        assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_header");
    }
}

#[tokio::test]
async fn test_lowercase_scheme_accepted() {
    let app = TestApp::new().await;
    let (status, _) =
        detail_with_header(&app, &format!("bearer {}", token(&["get:drinks-detail"]))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_header_rejection_never_fetches_keys() {
    let jwks = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS_JSON, "application/json"))
        .expect(0)
        .mount(&jwks)
        .await;
    let app = TestApp::with_key_server(jwks).await;

    detail_with_header(&app, "Basic xyz").await;
    // No kid in the token header.
    detail_with_header(&app, "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2ln").await;
}

#[tokio::test]
async fn test_token_without_kid() {
    let app = TestApp::new().await;
    let response =
        detail_with_header(&app, "Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2ln").await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_header");
}

#[tokio::test]
async fn test_unknown_kid() {
    let app = TestApp::new().await;
    let token = sign_with(&claims(&["get:drinks-detail"]), "unknown-key", PRIMARY_PEM);

    let response = app
        .send(Method::GET, "/drinks-detail", Some(&token), None)
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_header");
}

#[tokio::test]
async fn test_key_server_down() {
    let jwks = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&jwks)
        .await;
    let app = TestApp::with_key_server(jwks).await;

    let response = app
        .send(
            Method::GET,
            "/drinks-detail",
            Some(&token(&["get:drinks-detail"])),
            None,
        )
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_header");
}

#[tokio::test]
async fn test_keys_fetched_per_request() {
    let jwks = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS_JSON, "application/json"))
        .expect(2)
        .mount(&jwks)
        .await;
    let app = TestApp::with_key_server(jwks).await;
    let token = token(&["get:drinks-detail"]);

    for _ in 0..2 {
        let (status, _) = app
            .send(Method::GET, "/drinks-detail", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_configured_cache_fetches_keys_once() {
    let jwks = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JWKS_JSON, "application/json"))
        .expect(1)
        .mount(&jwks)
        .await;
    let app = TestApp::with_key_cache(jwks, Some(300)).await;
    let token = token(&["get:drinks-detail"]);

    for _ in 0..3 {
        let (status, _) = app
            .send(Method::GET, "/drinks-detail", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_key_without_use_is_rejected() {
    let mut key_set: Value = serde_json::from_str(JWKS_JSON).unwrap();
    for key in key_set["keys"].as_array_mut().unwrap() {
        key.as_object_mut().unwrap().remove("use");
    }

    let jwks = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JWKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(key_set))
        .mount(&jwks)
        .await;
    let app = TestApp::with_key_server(jwks).await;

    let response = app
        .send(
            Method::GET,
            "/drinks-detail",
            Some(&token(&["get:drinks-detail"])),
            None,
        )
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_header");
}

#[tokio::test]
async fn test_not_yet_valid_token() {
    let app = TestApp::new().await;
    let mut payload = claims(&["get:drinks-detail"]);
    payload["nbf"] = json!(now() + 3600);

    let response = app
        .send(Method::GET, "/drinks-detail", Some(&sign(&payload)), None)
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_claims");
}

#[tokio::test]
async fn test_non_numeric_id_checked_before_token() {
    let app = TestApp::new().await;

    for method in [Method::PATCH, Method::DELETE] {
        let (status, body) = app.send(method, "/drinks/latte", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "body: {body}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "resource not found");
    }
}

#[tokio::test]
async fn test_expired_token() {
    let app = TestApp::new().await;
    let mut payload = claims(&["get:drinks-detail"]);
    payload["exp"] = json!(now() - 60);

    let response = app
        .send(Method::GET, "/drinks-detail", Some(&sign(&payload)), None)
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "token_expired");
}

#[tokio::test]
async fn test_wrong_audience_and_issuer() {
    let app = TestApp::new().await;

    let mut wrong_aud = claims(&["get:drinks-detail"]);
    wrong_aud["aud"] = json!("someone-else");
    let response = app
        .send(Method::GET, "/drinks-detail", Some(&sign(&wrong_aud)), None)
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_claims");

    let mut wrong_iss = claims(&["get:drinks-detail"]);
    wrong_iss["iss"] = json!("https://evil.example.com/");
    let response = app
        .send(Method::GET, "/drinks-detail", Some(&sign(&wrong_iss)), None)
        .await;
    assert_auth_error(response, StatusCode::UNAUTHORIZED, "invalid_claims");
}

#[tokio::test]
async fn test_forged_signature() {
    let app = TestApp::new().await;
    // Signed by a key that is not the one published under this kid.
    let token = sign_with(&claims(&["get:drinks-detail"]), PRIMARY_KID, ROGUE_PEM);

    let response = app
        .send(Method::GET, "/drinks-detail", Some(&token), None)
        .await;
    assert_auth_error(response, StatusCode::BAD_REQUEST, "invalid_header");
}

#[tokio::test]
async fn test_missing_permissions_claim() {
    let app = TestApp::new().await;
    let mut payload = claims(&[]);
    payload.as_object_mut().unwrap().remove("permissions");

    let response = app
        .send(Method::GET, "/drinks-detail", Some(&sign(&payload)), None)
        .await;
    assert_auth_error(response, StatusCode::BAD_REQUEST, "invalid_claims");
}

#[tokio::test]
async fn test_permission_denied() {
    let app = TestApp::new().await;
    let response = app
        .send(
            Method::POST,
            "/drinks",
            Some(&token(&["get:drinks-detail"])),
            Some(json!({"title": "tea", "recipe": []})),
        )
        .await;
    assert_auth_error(response, StatusCode::FORBIDDEN, "unauthorized");

    // Nothing was written.
    assert!(app.state.drinks.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_authorization_runs_before_body_parsing() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/drinks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.send_request(request).await;
    assert_auth_error(
        response,
        StatusCode::UNAUTHORIZED,
        "authorization_header_missing",
    );
}

#[tokio::test]
async fn test_exact_permission_reaches_handler() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/drinks",
            Some(&token(&["post:drinks"])),
            Some(json!({
                "title": "espresso",
                "recipe": {"name": "coffee", "color": "brown", "parts": 1}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["drinks"][0]["title"], "espresso");
}

#[tokio::test]
async fn test_public_menu_needs_no_token() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/drinks", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "drinks": []}));
}
