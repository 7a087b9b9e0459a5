//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use budget_types::{
    AppError, ErrorBody, IdentityVerifier, Transaction, TransactionRepository, TransactionUid,
    UserRef,
};

use super::payload::ValidatedTransaction;
use crate::{TransactionEntity, TransactionService};

/// Application state shared across handlers.
pub struct AppState<R: TransactionRepository> {
    pub service: TransactionService<R>,
    pub identity: Arc<dyn IdentityVerifier>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if let AppError::Internal(msg) = &self.0 {
            tracing::error!(error = %msg, "request failed");
        }

        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

fn parse_uid(raw: &str) -> Result<TransactionUid, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid transaction uid".into()))
}

fn into_record<R: TransactionRepository>(
    entity: TransactionEntity<R>,
) -> Result<Transaction, AppError> {
    entity
        .to_transaction()
        .ok_or_else(|| AppError::Internal("transaction fields were not loaded".into()))
}

/// List the caller's transactions, newest first.
#[tracing::instrument(skip_all, fields(user = %user))]
pub async fn find_by_user<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user): Extension<UserRef>,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state
        .service
        .transaction()
        .with_user(user)
        .find_by_user()
        .await?;
    Ok(Json(transactions))
}

/// Get one of the caller's transactions.
#[tracing::instrument(skip_all, fields(user = %user, uid = %uid))]
pub async fn find_by_uid<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user): Extension<UserRef>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;

    let entity = state
        .service
        .transaction()
        .with_uid(uid)
        .with_user(user)
        .find_by_uid()
        .await?;
    Ok(Json(into_record(entity)?))
}

/// Create a transaction owned by the caller.
#[tracing::instrument(skip_all, fields(user = %user))]
pub async fn create<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user): Extension<UserRef>,
    ValidatedTransaction(params): ValidatedTransaction,
) -> Result<impl IntoResponse, ApiError> {
    let entity = state
        .service
        .transaction()
        .with_user(user)
        .create(params)
        .await?;
    Ok((StatusCode::CREATED, Json(into_record(entity)?)))
}

/// Replace the editable fields of one of the caller's transactions.
#[tracing::instrument(skip_all, fields(user = %user, uid = %uid))]
pub async fn update<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user): Extension<UserRef>,
    Path(uid): Path<String>,
    ValidatedTransaction(params): ValidatedTransaction,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;

    let entity = state
        .service
        .transaction()
        .with_uid(uid)
        .with_user(user)
        .with_details(params)
        .update()
        .await?;
    Ok(Json(into_record(entity)?))
}

/// Delete one of the caller's transactions, returning its last state.
#[tracing::instrument(skip_all, fields(user = %user, uid = %uid))]
pub async fn delete<R: TransactionRepository>(
    State(state): State<Arc<AppState<R>>>,
    Extension(user): Extension<UserRef>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;

    let entity = state
        .service
        .transaction()
        .with_uid(uid)
        .with_user(user)
        .delete()
        .await?;
    Ok(Json(into_record(entity)?))
}
