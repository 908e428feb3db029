//! Honeytoken record.

use serde::{Deserialize, Serialize};

/// A decoy URL whose retrieval triggers an alert.
///
/// `id` is assigned by the registry and is never zero for a stored row;
/// zero is reserved as the "no record" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Honeytoken {
    pub id: i64,
    /// Exact request target (path plus query) that triggers this token.
    pub url: String,
    pub title: String,
    pub comment: String,
    /// Where the alert is delivered (an e-mail address).
    pub notify_receiver: String,
}

impl Honeytoken {
    /// Whether this is a real stored record rather than the zero sentinel.
    pub fn is_stored(&self) -> bool {
        self.id != 0
    }
}

/// Fields for a token that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHoneytoken {
    pub url: String,
    pub title: String,
    pub comment: String,
    pub notify_receiver: String,
}
