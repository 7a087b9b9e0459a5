//! Shared database row types for SQLite and PostgreSQL.
//!
//! Both backends store the uid as a native UUID (a 16-byte BLOB on SQLite)
//! and the date as a calendar date, so one row struct decodes either.

use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use budget_types::{
    Money, RepoError, Transaction, TransactionDetails, TransactionKind, TransactionUid, UserRef,
};

/// Column list shared by every SELECT on the transactions table.
pub const TRANSACTION_COLUMNS: &str =
    "id, user_uid, date, description, currency, value, transaction_type, kind";

/// Transaction row from database.
#[derive(FromRow)]
pub struct DbTransaction {
    pub id: Uuid,
    pub user_uid: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub currency: String,
    pub value: f64,
    pub transaction_type: String,
    pub kind: String,
}

impl DbTransaction {
    pub fn into_domain(self) -> Result<Transaction, RepoError> {
        let money = Money::new(self.currency, self.value)?;
        let kind: TransactionKind = self.kind.parse()?;

        Ok(Transaction::from_parts(
            TransactionUid::from_uuid(self.id),
            UserRef::new(self.user_uid),
            TransactionDetails {
                date: self.date,
                description: self.description,
                money,
                transaction_type: self.transaction_type,
                kind,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_types::DomainError;

    fn row(kind: &str, value: f64) -> DbTransaction {
        DbTransaction {
            id: Uuid::new_v4(),
            user_uid: "u1".into(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            description: None,
            currency: "USD".into(),
            value,
            transaction_type: "Groceries".into(),
            kind: kind.into(),
        }
    }

    #[test]
    fn test_row_into_domain() {
        let tx = row("expense", 12.5).into_domain().unwrap();

        assert_eq!(tx.user, UserRef::new("u1"));
        assert_eq!(tx.details.kind, TransactionKind::Expense);
        assert_eq!(tx.details.money.value(), 12.5);
    }

    #[test]
    fn test_corrupt_kind_is_rejected() {
        let err = row("transfer", 12.5).into_domain().unwrap_err();

        assert!(matches!(
            err,
            RepoError::Domain(DomainError::UnknownKind(ref k)) if k == "transfer"
        ));
    }
}
