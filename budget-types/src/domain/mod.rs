//! Domain models for the budget service.

pub mod money;
pub mod transaction;
pub mod user;

pub use money::Money;
pub use transaction::{Transaction, TransactionDetails, TransactionKind, TransactionUid};
pub use user::UserRef;
