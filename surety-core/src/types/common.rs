//! Basic identity types.
//!
//! Naming conventions:
//! - `_id` suffix: Primary key identifiers
//! - `key` types: Composite primary keys

use serde::{Deserialize, Serialize};

/// Account ID - the caller identity the ledger substrate binds to every
/// call. Airlines, passengers, oracles and the admin are all accounts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
