//! Drives a live server through the client SDK.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use budget_client::{BudgetClient, ClientError};
use budget_hex::{TransactionService, inbound::HttpServer};
use budget_repo::{JwtVerifier, SqliteRepo};
use budget_types::{Money, TransactionDetails, TransactionKind};
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "roundtrip-secret";

fn token_for(uid: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    encode(
        &Header::default(),
        &serde_json::json!({ "sub": uid, "exp": exp }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Starts a server on an ephemeral port backed by an on-disk database.
async fn spawn_server(dir: &tempfile::TempDir) -> String {
    let url = format!("sqlite://{}/nested/budget.db", dir.path().display());
    let repo = SqliteRepo::new(&url).await.unwrap();
    let server = HttpServer::new(TransactionService::new(repo), JwtVerifier::new(SECRET));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = server.router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn groceries(value: f64) -> TransactionDetails {
    TransactionDetails {
        date: chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        description: Some("weekly shop".to_string()),
        money: Money::new("EUR", value).unwrap(),
        transaction_type: "Groceries".to_string(),
        kind: TransactionKind::Expense,
    }
}

#[tokio::test]
async fn test_client_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = BudgetClient::new(&base_url).with_token(token_for("u1"));

    assert!(client.health().await.unwrap());

    let created = client.create_transaction(&groceries(42.0)).await.unwrap();
    let uid = created.uid.unwrap();
    assert_eq!(created.user.uid, "u1");

    let updated = client
        .update_transaction(uid, &groceries(50.0))
        .await
        .unwrap();
    assert_eq!(updated.details.money.value(), 50.0);

    let fetched = client.get_transaction(uid).await.unwrap();
    assert_eq!(fetched, updated);

    let listed = client.list_transactions().await.unwrap();
    assert_eq!(listed, vec![fetched]);

    client.delete_transaction(uid).await.unwrap();
    assert!(client.list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_client_surfaces_api_errors() {
    let dir = tempfile::tempdir().unwrap();
    let base_url = spawn_server(&dir).await;

    let owner = BudgetClient::new(&base_url).with_token(token_for("u1"));
    let other = BudgetClient::new(&base_url).with_token(token_for("u2"));
    let anonymous = BudgetClient::new(&base_url);

    let uid = owner
        .create_transaction(&groceries(10.0))
        .await
        .unwrap()
        .uid
        .unwrap();

    match other.get_transaction(uid).await {
        Err(ClientError::Api { status, kind, .. }) => {
            assert_eq!(status, 403);
            assert_eq!(kind.as_deref(), Some("UserDoesntOwnTransactionError"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    match anonymous.list_transactions().await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("unexpected result: {other:?}"),
    }
}
