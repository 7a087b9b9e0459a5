//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use budget_types::domain::{
    Money, Transaction, TransactionDetails, TransactionKind, TransactionUid, UserRef,
};
use budget_types::dto::ErrorBody;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List the caller's transactions, newest first
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Transactions of the authenticated user", body = Vec<Transaction>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn find_by_user() {}

/// Create a transaction for the caller
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "transactions",
    request_body = TransactionDetails,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn create() {}

/// Get one of the caller's transactions
#[utoipa::path(
    get,
    path = "/api/transactions/{uid}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("uid" = TransactionUid, Path, description = "Transaction uid (UUID)")
    ),
    responses(
        (status = 200, description = "Transaction details", body = Transaction),
        (status = 403, description = "Transaction belongs to another user", body = ErrorBody),
        (status = 404, description = "Transaction not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn find_by_uid() {}

/// Replace the editable fields of one of the caller's transactions
#[utoipa::path(
    put,
    path = "/api/transactions/{uid}",
    tag = "transactions",
    request_body = TransactionDetails,
    security(("bearer_auth" = [])),
    params(
        ("uid" = TransactionUid, Path, description = "Transaction uid (UUID)")
    ),
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 403, description = "Transaction belongs to another user", body = ErrorBody),
        (status = 404, description = "Transaction not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn update() {}

/// Delete one of the caller's transactions
#[utoipa::path(
    delete,
    path = "/api/transactions/{uid}",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(
        ("uid" = TransactionUid, Path, description = "Transaction uid (UUID)")
    ),
    responses(
        (status = 200, description = "Transaction deleted, last known state returned", body = Transaction),
        (status = 403, description = "Transaction belongs to another user", body = ErrorBody),
        (status = 404, description = "Transaction not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
async fn delete() {}

/// OpenAPI documentation for the Budget API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Budget Service API",
        version = "1.0.0",
        description = "Personal finance backend: record income and expense transactions per user.\n\n## Authentication\n\nEvery `/api` endpoint requires an ID token issued by the identity provider in the `Authorization` header:\n\n```\nAuthorization: Bearer <id_token>\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        find_by_user,
        create,
        find_by_uid,
        update,
        delete,
    ),
    components(
        schemas(
            Transaction,
            TransactionDetails,
            TransactionKind,
            TransactionUid,
            Money,
            UserRef,
            ErrorBody,
        )
    ),

    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "transactions", description = "Income and expense records of the authenticated user"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
