//! Transaction entity.
//!
//! The entity carries a transaction's state together with the lifecycle
//! operations that load, persist and remove it through the repository port.
//! Lifecycle methods consume the entity and hand back the updated one, so
//! callers keep working with "the same instance" without sharing mutable
//! state across tasks:
//!
//! ```ignore
//! let tx = service.transaction().with_uid(uid).with_user(user);
//! let tx = tx.find_by_uid().await?;
//! ```

use std::sync::Arc;

use budget_types::{
    AppError, Transaction, TransactionDetails, TransactionRepository, TransactionUid, UserRef,
};

/// A request-scoped transaction bound to a repository.
pub struct TransactionEntity<R: TransactionRepository> {
    repo: Arc<R>,
    uid: Option<TransactionUid>,
    user: Option<UserRef>,
    details: Option<TransactionDetails>,
}

impl<R: TransactionRepository> TransactionEntity<R> {
    /// Creates a transient entity with no identity.
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            uid: None,
            user: None,
            details: None,
        }
    }

    pub fn with_uid(mut self, uid: TransactionUid) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn with_user(mut self, user: UserRef) -> Self {
        self.user = Some(user);
        self
    }

    /// Replaces the editable fields held in memory (used before `update`).
    pub fn with_details(mut self, details: TransactionDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn uid(&self) -> Option<TransactionUid> {
        self.uid
    }

    pub fn user(&self) -> Option<&UserRef> {
        self.user.as_ref()
    }

    pub fn details(&self) -> Option<&TransactionDetails> {
        self.details.as_ref()
    }

    /// Snapshot of the entity as a transaction record.
    ///
    /// Returns `None` while the owner or the transaction fields are unknown.
    pub fn to_transaction(&self) -> Option<Transaction> {
        Some(Transaction {
            uid: self.uid,
            details: self.details.clone()?,
            user: self.user.clone()?,
        })
    }

    fn informed_user_uid(&self) -> Option<&str> {
        self.user.as_ref().and_then(UserRef::informed_uid)
    }

    /// Lists every transaction owned by this entity's user, newest first.
    #[tracing::instrument(skip_all, fields(user = ?self.user))]
    pub async fn find_by_user(&self) -> Result<Vec<Transaction>, AppError> {
        let user_uid = self.informed_user_uid().ok_or(AppError::UserNotInformed)?;

        let transactions = self.repo.find_by_user_uid(user_uid).await?;
        tracing::debug!(count = transactions.len(), "loaded transactions for user");
        Ok(transactions)
    }

    /// Loads the persisted fields of the transaction identified by `uid`.
    ///
    /// The stored owner must match this entity's user.
    #[tracing::instrument(skip_all, fields(uid = ?self.uid))]
    pub async fn find_by_uid(mut self) -> Result<Self, AppError> {
        let stored = self.load_owned().await?;

        self.user = Some(stored.user);
        self.details = Some(stored.details);
        Ok(self)
    }

    /// Persists `params` as a new transaction owned by this entity's user.
    ///
    /// The owner is always the user already set on the entity.
    #[tracing::instrument(skip_all, fields(user = ?self.user))]
    pub async fn create(mut self, params: TransactionDetails) -> Result<Self, AppError> {
        let user = self
            .user
            .clone()
            .filter(|user| user.informed_uid().is_some())
            .ok_or(AppError::UserNotInformed)?;

        self.details = Some(params.clone());

        let uid = self.repo.save(&Transaction::new(user, params)).await?;
        tracing::info!(%uid, "transaction created");

        self.uid = Some(uid);
        Ok(self)
    }

    /// Writes the in-memory fields over the stored transaction.
    ///
    /// Without in-memory fields the stored ones are written back unchanged.
    #[tracing::instrument(skip_all, fields(uid = ?self.uid))]
    pub async fn update(mut self) -> Result<Self, AppError> {
        let stored = self.load_owned().await?;

        let record = Transaction {
            uid: self.uid,
            details: self.details.take().unwrap_or(stored.details),
            user: stored.user,
        };
        self.repo.update(&record).await?;
        tracing::info!("transaction updated");

        self.user = Some(record.user);
        self.details = Some(record.details);
        Ok(self)
    }

    /// Removes the transaction, returning the entity with its last known fields.
    #[tracing::instrument(skip_all, fields(uid = ?self.uid))]
    pub async fn delete(mut self) -> Result<Self, AppError> {
        let stored = self.load_owned().await?;

        self.repo.delete(&stored).await?;
        tracing::info!("transaction deleted");

        self.user = Some(stored.user);
        self.details = Some(stored.details);
        Ok(self)
    }

    /// Fetches the stored record for `uid` and checks it belongs to `user`.
    async fn load_owned(&self) -> Result<Transaction, AppError> {
        let uid = self.uid.ok_or(AppError::TransactionUidNotInformed)?;

        let stored = self
            .repo
            .find_by_uid(uid)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        let owned = self
            .user
            .as_ref()
            .is_some_and(|user| stored.is_owned_by(user));

        if !owned {
            tracing::warn!(%uid, caller = ?self.user, "transaction belongs to another user");
            return Err(AppError::UserDoesntOwnTransaction);
        }

        Ok(stored)
    }
}
