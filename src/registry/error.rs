//! Error types for the token registry.

use thiserror::Error;

/// Errors that can occur while reading or writing the token registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No token is registered for the key.
    #[error("no token found for {0:?}")]
    NotFound(String),

    /// The storage engine failed.
    #[error("registry storage error: {0}")]
    Storage(String),

    /// A database migration failed.
    #[error("registry migration failed: {0}")]
    Migration(String),

    /// An invalid database location or record was provided.
    #[error("invalid registry input: {0}")]
    InvalidInput(String),

    /// A token with the same URL already exists.
    #[error("a token for {0:?} already exists")]
    AlreadyExists(String),
}

impl RegistryError {
    /// Whether this is an ordinary miss rather than a storage failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}
