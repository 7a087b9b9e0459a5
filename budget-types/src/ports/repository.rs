//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::{Transaction, TransactionUid};
use crate::error::RepoError;

/// Document-style storage for transactions, keyed by generated uids.
#[async_trait::async_trait]
pub trait TransactionRepository: Send + Sync + 'static {
    /// Lists the transactions owned by `user_uid`, newest date first.
    async fn find_by_user_uid(&self, user_uid: &str) -> Result<Vec<Transaction>, RepoError>;

    /// Gets a transaction by uid.
    async fn find_by_uid(&self, uid: TransactionUid) -> Result<Option<Transaction>, RepoError>;

    /// Persists a new transaction and returns its generated uid.
    ///
    /// Any uid already set on `transaction` is ignored.
    async fn save(&self, transaction: &Transaction) -> Result<TransactionUid, RepoError>;

    /// Overwrites the editable fields of the transaction keyed by `transaction.uid`.
    ///
    /// The owner is never changed.
    async fn update(&self, transaction: &Transaction) -> Result<(), RepoError>;

    /// Removes the transaction keyed by `transaction.uid`.
    async fn delete(&self, transaction: &Transaction) -> Result<(), RepoError>;
}
