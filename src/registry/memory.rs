//! In-memory token registry.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::registry::error::RegistryError;
use crate::registry::model::{Honeytoken, NewHoneytoken};
use crate::registry::TokenRegistry;

/// A thread-safe registry keyed by exact URL.
#[derive(Clone, Debug, Default)]
pub struct MemoryRegistry {
    tokens: Arc<DashMap<String, Honeytoken>>,
    last_id: Arc<AtomicI64>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new token. Ids start at 1.
    pub fn insert(&self, token: NewHoneytoken) -> Result<Honeytoken, RegistryError> {
        if token.url.is_empty() {
            return Err(RegistryError::InvalidInput("url must not be empty".into()));
        }

        match self.tokens.entry(token.url.clone()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyExists(token.url)),
            Entry::Vacant(slot) => {
                let stored = Honeytoken {
                    id: self.last_id.fetch_add(1, Ordering::Relaxed) + 1,
                    url: token.url,
                    title: token.title,
                    comment: token.comment,
                    notify_receiver: token.notify_receiver,
                };
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    /// Put a record in place as-is, including its id. Used to seed fixtures.
    pub fn put(&self, token: Honeytoken) {
        self.tokens.insert(token.url.clone(), token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenRegistry for MemoryRegistry {
    async fn find(&self, url: &str) -> Result<Honeytoken, RegistryError> {
        match self.tokens.get(url) {
            Some(token) if token.is_stored() => Ok(token.clone()),
            _ => Err(RegistryError::NotFound(url.to_string())),
        }
    }
}
