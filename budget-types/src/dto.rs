//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// JSON body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error kind
    #[schema(example = "TransactionNotFoundError")]
    pub error: String,
    /// Human-readable message
    #[schema(example = "Transaction not found")]
    pub message: String,
    /// HTTP status code
    #[schema(example = 404)]
    pub code: u16,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        let message = match err {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        Self {
            error: err.kind().to_string(),
            message,
            code: err.status_code(),
        }
    }
}
