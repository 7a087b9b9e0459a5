//! Identity verification port.
//!
//! Resolves a bearer credential to the user it was issued for.

use crate::domain::UserRef;

/// Error type for identity verification.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Port trait for identity providers.
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Verifies `token` and returns the user it identifies.
    async fn verify(&self, token: &str) -> Result<UserRef, IdentityError>;
}
