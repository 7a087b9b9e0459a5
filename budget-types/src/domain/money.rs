//! Monetary value with its currency code.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// An amount of money tagged with a currency code.
///
/// The currency is a free-form code (`"USD"`, `"BRL"`, ...); amounts in
/// different currencies are never combined, so no conversion table is kept.
/// The value is signless in meaning: whether money comes in or goes out is
/// carried by the transaction's [`TransactionKind`](super::TransactionKind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawMoney")]
pub struct Money {
    /// Currency code
    #[schema(example = "USD")]
    currency: String,
    /// Amount, never zero
    #[schema(example = 100)]
    value: f64,
}

impl Money {
    /// Creates a new Money value.
    ///
    /// # Validation
    /// - Currency cannot be empty
    /// - Value must be finite and non-zero
    pub fn new(currency: impl Into<String>, value: f64) -> Result<Self, DomainError> {
        let currency = currency.into();
        if currency.trim().is_empty() {
            return Err(DomainError::EmptyCurrency);
        }
        if !value.is_finite() {
            return Err(DomainError::NonFiniteValue);
        }
        if value == 0.0 {
            return Err(DomainError::ZeroValue);
        }
        Ok(Self { currency, value })
    }

    /// Returns the currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the amount.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Wire form of [`Money`], checked by [`Money::new`] on deserialization.
#[derive(Deserialize)]
struct RawMoney {
    currency: String,
    value: f64,
}

impl TryFrom<RawMoney> for Money {
    type Error = DomainError;

    fn try_from(raw: RawMoney) -> Result<Self, Self::Error> {
        Money::new(raw.currency, raw.value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.value)
    }
}
