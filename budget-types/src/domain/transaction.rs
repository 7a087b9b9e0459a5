//! Transaction domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::Money;
use super::user::UserRef;
use crate::error::DomainError;

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionUid(Uuid);

impl TransactionUid {
    /// Creates a new random TransactionUid.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionUid from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for TransactionUid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionUid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Direction of a transaction from the owner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

/// The user-editable fields of a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// Calendar date of the movement
    #[schema(example = "2023-01-01")]
    pub date: NaiveDate,
    /// Optional free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub money: Money,
    /// Free-form category label
    #[schema(example = "Groceries")]
    pub transaction_type: String,
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// A recorded financial movement owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Unique identifier, absent until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<TransactionUid>,
    #[serde(flatten)]
    pub details: TransactionDetails,
    /// Owning account
    pub user: UserRef,
}

impl Transaction {
    /// Creates a not-yet-persisted transaction for `user`.
    pub fn new(user: UserRef, details: TransactionDetails) -> Self {
        Self {
            uid: None,
            details,
            user,
        }
    }

    /// Reconstructs a persisted transaction from stored fields.
    pub fn from_parts(uid: TransactionUid, user: UserRef, details: TransactionDetails) -> Self {
        Self {
            uid: Some(uid),
            details,
            user,
        }
    }

    /// Returns true when `user` is the owner of this transaction.
    pub fn is_owned_by(&self, user: &UserRef) -> bool {
        self.user.informed_uid().is_some() && self.user.uid == user.uid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> TransactionDetails {
        TransactionDetails {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            description: None,
            money: Money::new("USD", 100.0).unwrap(),
            transaction_type: "Groceries".to_string(),
            kind: TransactionKind::Income,
        }
    }

    #[test]
    fn test_new_transaction_has_no_uid() {
        let tx = Transaction::new(UserRef::new("u1"), details());
        assert!(tx.uid.is_none());
        assert_eq!(tx.user, UserRef::new("u1"));
    }

    #[test]
    fn test_ownership() {
        let tx = Transaction::new(UserRef::new("u1"), details());
        assert!(tx.is_owned_by(&UserRef::new("u1")));
        assert!(!tx.is_owned_by(&UserRef::new("other")));
        assert!(!tx.is_owned_by(&UserRef::new("")));
    }

    #[test]
    fn test_padded_uid_is_a_different_owner() {
        let tx = Transaction::new(UserRef::new(" u1"), details());
        assert!(!tx.is_owned_by(&UserRef::new("u1")));
        assert!(tx.is_owned_by(&UserRef::new(" u1")));

        let tx = Transaction::new(UserRef::new("u1"), details());
        assert!(!tx.is_owned_by(&UserRef::new("u1 ")));
    }

    #[test]
    fn test_transaction_json_shape() {
        let uid = TransactionUid::new();
        let tx = Transaction::from_parts(uid, UserRef::new("u1"), details());
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["uid"], serde_json::json!(uid.to_string()));
        assert_eq!(json["date"], "2023-01-01");
        assert_eq!(json["transactionType"], "Groceries");
        assert_eq!(json["type"], "income");
        assert_eq!(json["money"]["currency"], "USD");
        assert_eq!(json["user"]["uid"], "u1");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("income".parse::<TransactionKind>().unwrap(), TransactionKind::Income);
        assert_eq!("expense".parse::<TransactionKind>().unwrap(), TransactionKind::Expense);
        assert!(matches!(
            "transfer".parse::<TransactionKind>(),
            Err(DomainError::UnknownKind(_))
        ));
    }
}
