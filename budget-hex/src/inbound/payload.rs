//! Request body extractor for transaction payloads.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use budget_types::{AppError, TransactionDetails, validate_transaction_payload};

use super::handlers::ApiError;

/// A JSON body that passed transaction field validation.
///
/// Malformed JSON and validation failures are both rejected with 400 before
/// the handler runs. Unknown fields, including any `user`, are dropped.
#[derive(Debug)]
pub struct ValidatedTransaction(pub TransactionDetails);

impl<S> FromRequest<S> for ValidatedTransaction
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let details = validate_transaction_payload(&payload).map_err(|err| {
            tracing::debug!(error = %err, "transaction payload rejected");
            AppError::from(err)
        })?;

        Ok(Self(details))
    }
}
