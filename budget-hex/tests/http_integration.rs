//! End-to-end HTTP tests against SQLite and the JWT identity adapter.
//!
//! These tests exercise the full middleware stack: token verification,
//! per-user rate limiting (429 responses), payload validation and the
//! ownership rules of the transaction entity.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use budget_hex::{TransactionService, inbound::HttpServer};
use budget_repo::{JwtVerifier, SqliteRepo};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

/// Helper to create a test server with the given per-user rate limit.
async fn create_test_server(requests_per_minute: u32) -> HttpServer<SqliteRepo> {
    // Use in-memory SQLite for tests
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let service = TransactionService::new(repo);
    HttpServer::with_rate_limit(service, JwtVerifier::new(SECRET), requests_per_minute)
}

/// Helper to mint an ID token for `uid`.
fn token_for(uid: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    encode(
        &Header::default(),
        &json!({ "sub": uid, "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

fn list_request(token: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/transactions")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_transaction_lifecycle() {
    let server = create_test_server(100).await;
    let app = server.router();
    let token = token_for("u1");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/transactions",
            &token,
            json!({
                "date": "2023-01-01",
                "money": { "currency": "USD", "value": 100 },
                "transactionType": "Groceries",
                "type": "income"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let uid = created["uid"].as_str().unwrap().to_string();
    assert_eq!(created["user"]["uid"], "u1");

    let uri = format!("/api/transactions/{}", uid);
    let response = app
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &uri,
            &token,
            json!({
                "date": "2023-02-01",
                "description": "refund",
                "money": { "currency": "USD", "value": -20.5 },
                "transactionType": "Groceries",
                "type": "expense"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(list_request(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["uid"], uid.as_str());
    assert_eq!(listed[0]["description"], "refund");
    assert_eq!(listed[0]["money"]["value"], -20.5);
    assert_eq!(listed[0]["type"], "expense");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(&uri)
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(list_request(&token)).await.unwrap();
    let listed = body_json(response).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_transaction_is_forbidden() {
    let server = create_test_server(100).await;
    let app = server.router();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/transactions",
            &token_for("u1"),
            json!({
                "date": "2023-01-01",
                "money": { "currency": "EUR", "value": 5 },
                "transactionType": "Coffee",
                "type": "expense"
            }),
        ))
        .await
        .unwrap();
    let uid = body_json(response).await["uid"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/transactions/{}", uid))
                .header("Authorization", format!("Bearer {}", token_for("u2")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "UserDoesntOwnTransactionError");
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_unauthorized() {
    let server = create_test_server(100).await;
    let app = server.router();
    let forged = encode(
        &Header::default(),
        &json!({ "sub": "u1", "exp": chrono::Utc::now().timestamp() + 3600 }),
        &EncodingKey::from_secret(b"someone-else"),
    )
    .unwrap();

    let response = app.oneshot(list_request(&forged)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    // Create server with only 3 requests allowed per minute
    let server = create_test_server(3).await;
    let app = server.router();
    let token = token_for("u1");

    // Make 3 requests (uses up the quota for this user)
    for i in 1..=3 {
        let response = app.clone().oneshot(list_request(&token)).await.unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited (quota not yet exceeded)",
            i
        );
    }

    // 4th request should be rate limited
    let response = app.clone().oneshot(list_request(&token)).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_per_user_isolation() {
    let server = create_test_server(1).await;
    let app = server.router();

    let response = app.clone().oneshot(list_request(&token_for("u1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.clone().oneshot(list_request(&token_for("u1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // u2 has its own quota
    let response = app.clone().oneshot(list_request(&token_for("u2"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    // Create server with only 1 request allowed per minute
    let server = create_test_server(1).await;
    let app = server.router();

    // Health endpoint bypasses rate limiting entirely
    for _ in 0..10 {
        let response = app.clone().oneshot(health_request()).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}
