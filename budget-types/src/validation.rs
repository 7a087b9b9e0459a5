//! Shape checks for raw transaction payloads.
//!
//! The checks run in a fixed order and stop at the first failure, so a
//! payload with several problems always reports the earliest one.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::domain::{Money, TransactionDetails, TransactionKind};

/// Reasons a transaction payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Date not informed")]
    DateNotInformed,

    #[error("Invalid date")]
    InvalidDate,

    #[error("Money not informed")]
    MoneyNotInformed,

    #[error("Currency not informed")]
    CurrencyNotInformed,

    #[error("Value not informed")]
    ValueNotInformed,

    #[error("Transaction type not informed")]
    TransactionTypeNotInformed,

    #[error("Type 'income' or 'expense' not informed")]
    TypeNotInformed,

    #[error("Invalid type")]
    InvalidType,

    #[error("Invalid description")]
    InvalidDescription,
}

/// Validates a raw payload and extracts the transaction fields from it.
///
/// Any `user` or `uid` present in the payload is ignored: ownership always
/// comes from the authenticated caller.
pub fn validate_transaction_payload(payload: &Value) -> Result<TransactionDetails, ValidationError> {
    let date = match informed_str(payload.get("date")) {
        Some(raw) => parse_date(raw).ok_or(ValidationError::InvalidDate)?,
        None if is_informed(payload.get("date")) => return Err(ValidationError::InvalidDate),
        None => return Err(ValidationError::DateNotInformed),
    };

    let money = payload
        .get("money")
        .filter(|m| is_informed(Some(m)))
        .ok_or(ValidationError::MoneyNotInformed)?;

    let currency =
        informed_str(money.get("currency")).ok_or(ValidationError::CurrencyNotInformed)?;

    let value = money
        .get("value")
        .and_then(Value::as_f64)
        .filter(|v| *v != 0.0 && v.is_finite())
        .ok_or(ValidationError::ValueNotInformed)?;

    let transaction_type = informed_str(payload.get("transactionType"))
        .ok_or(ValidationError::TransactionTypeNotInformed)?;

    let kind = match informed_str(payload.get("type")) {
        Some(raw) => raw
            .parse::<TransactionKind>()
            .map_err(|_| ValidationError::InvalidType)?,
        None if is_informed(payload.get("type")) => return Err(ValidationError::InvalidType),
        None => return Err(ValidationError::TypeNotInformed),
    };

    let description = match payload.get("description") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => return Err(ValidationError::InvalidDescription),
    };

    // Checked above; Money::new cannot fail here.
    let money = Money::new(currency, value).map_err(|_| ValidationError::ValueNotInformed)?;

    Ok(TransactionDetails {
        date,
        description,
        money,
        transaction_type: transaction_type.to_string(),
        kind,
    })
}

/// A non-empty string value.
fn informed_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Anything other than absent, null, `false`, `0` or an empty string.
fn is_informed(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Accepts a plain calendar date or an RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
