//! Transaction Application Service
//!
//! Owns the repository and hands out request-scoped transaction entities
//! bound to it. Contains NO infrastructure logic.

use std::sync::Arc;

use budget_types::TransactionRepository;

use crate::model::TransactionEntity;

/// Factory for [`TransactionEntity`] values.
///
/// Generic over `R: TransactionRepository` - the adapter is injected at compile time.
/// Production wires the database repository; tests wire an in-memory mock.
pub struct TransactionService<R: TransactionRepository> {
    repo: Arc<R>,
}

impl<R: TransactionRepository> TransactionService<R> {
    /// Creates a new transaction service with the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates a fresh, transient entity bound to this service's repository.
    pub fn transaction(&self) -> TransactionEntity<R> {
        TransactionEntity::new(Arc::clone(&self.repo))
    }
}
