//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use budget_types::{RepoError, Transaction, TransactionRepository, TransactionUid};

use crate::types::{DbTransaction, TRANSACTION_COLUMNS};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_transactions_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl TransactionRepository for PostgresRepo {
    async fn find_by_user_uid(&self, user_uid: &str) -> Result<Vec<Transaction>, RepoError> {
        let rows: Vec<DbTransaction> = sqlx::query_as(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_uid = $1 \
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
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
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
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
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
               SET date = $1, description = $2, currency = $3, value = $4, transaction_type = $5, kind = $6
               WHERE id = $7"#,
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

        let result = sqlx::query(r#"DELETE FROM transactions WHERE id = $1"#)
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
