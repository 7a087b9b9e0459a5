//! # Budget Types
//!
//! Domain types and port traits for the personal-finance transaction service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Money, Transaction, UserRef)
//! - `validation/` - Shape checks for raw transaction payloads
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod validation;

// Re-export commonly used types
pub use domain::{
    Money, Transaction, TransactionDetails, TransactionKind, TransactionUid, UserRef,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{IdentityError, IdentityVerifier, TransactionRepository};
pub use validation::{ValidationError, validate_transaction_payload};
