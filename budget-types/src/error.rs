//! Error types for the budget service.

use crate::validation::ValidationError;

/// Domain-level errors (business rule violations on value types).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Money value cannot be zero")]
    ZeroValue,

    #[error("Money value must be a finite number")]
    NonFiniteValue,

    #[error("Currency cannot be empty")]
    EmptyCurrency,

    #[error("Unknown transaction type: {0}")]
    UnknownKind(String),
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Record has no uid")]
    MissingUid,

    #[error("Entity not found")]
    NotFound,
}

/// Application-level errors.
///
/// Every variant carries an explicit HTTP status code, so the inbound
/// adapter maps errors to responses with an exhaustive match.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("User not informed")]
    UserNotInformed,

    #[error("Transaction uid not informed")]
    TransactionUidNotInformed,

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("User doesn't own this transaction")]
    UserDoesntOwnTransaction,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code associated with this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::UserNotInformed => 400,
            AppError::TransactionUidNotInformed => 400,
            AppError::TransactionNotFound => 404,
            AppError::UserDoesntOwnTransaction => 403,
            AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Internal(_) => 500,
        }
    }

    /// Stable, machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::UserNotInformed => "UserNotInformedError",
            AppError::TransactionUidNotInformed => "TransactionUidNotInformedError",
            AppError::TransactionNotFound => "TransactionNotFoundError",
            AppError::UserDoesntOwnTransaction => "UserDoesntOwnTransactionError",
            AppError::BadRequest(_) => "BadRequestError",
            AppError::Unauthorized(_) => "UnauthorizedError",
            AppError::Internal(_) => "InternalError",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::Internal(format!("Corrupt record: {}", e)),
            RepoError::NotFound => AppError::TransactionNotFound,
            RepoError::MissingUid => AppError::TransactionUidNotInformed,
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}
