//! # Budget Hex
//!
//! Transaction entity, application service and HTTP adapter for the budget
//! service.
//!
//! ## Architecture
//!
//! - `model/` - Transaction entity (ownership and lifecycle rules)
//! - `service/` - Factory that binds entities to a repository
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: TransactionRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod model;
pub mod openapi;
pub mod service;


pub use model::TransactionEntity;
pub use service::TransactionService;
