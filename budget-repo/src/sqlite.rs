//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use uuid::Uuid;

use budget_types::{RepoError, Transaction, TransactionRepository, TransactionUid};

use crate::types::{DbTransaction, TRANSACTION_COLUMNS};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;

        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_transactions.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for SqliteRepo {
    async fn find_by_user_uid(&self, user_uid: &str) -> Result<Vec<Transaction>, RepoError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_uid = ? \
             ORDER BY date DESC, created_at DESC"
        ))
        .bind(user_uid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbTransaction::into_domain).collect()
    }

    async fn find_by_uid(&self, uid: TransactionUid) -> Result<Option<Transaction>, RepoError> {
        let row: Option<DbTransaction> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(uid.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbTransaction::into_domain).transpose()
    }

    async fn save(&self, transaction: &Transaction) -> Result<TransactionUid, RepoError> {
        let id = Uuid::new_v4();
        let details = &transaction.details;

        sqlx::query(
            r#"INSERT INTO transactions (id, user_uid, date, description, currency, value, transaction_type, kind)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(&transaction.user.uid)
        .bind(details.date)
        .bind(&details.description)
        .bind(details.money.currency())
        .bind(details.money.value())
        .bind(&details.transaction_type)
        .bind(details.kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(TransactionUid::from_uuid(id))
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), RepoError> {
        let uid = transaction.uid.ok_or(RepoError::MissingUid)?;
        let details = &transaction.details;

        let result = sqlx::query(
            r#"UPDATE transactions
               SET date = ?, description = ?, currency = ?, value = ?, transaction_type = ?, kind = ?
               WHERE id = ?"#,
        )
        .bind(details.date)
        .bind(&details.description)
        .bind(details.money.currency())
        .bind(details.money.value())
        .bind(&details.transaction_type)
        .bind(details.kind.as_str())
        .bind(uid.into_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, transaction: &Transaction) -> Result<(), RepoError> {
        let uid = transaction.uid.ok_or(RepoError::MissingUid)?;

        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = ?"#)
            .bind(uid.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
