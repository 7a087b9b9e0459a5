//! Reference to the account that owns a transaction.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifies a user account by the uid issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct UserRef {
    #[schema(example = "u1")]
    pub uid: String,
}

impl UserRef {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    /// Returns the uid when it is usable for lookups (non-empty).
    ///
    /// The uid is returned exactly as issued; padded uids are distinct users.
    pub fn informed_uid(&self) -> Option<&str> {
        (!self.uid.is_empty()).then_some(self.uid.as_str())
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uid)
    }
}
