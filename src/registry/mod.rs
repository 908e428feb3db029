//! Token registry subsystem.
//!
//! # Data Flow
//! ```text
//! request target (path + query, byte-exact)
//!     → TokenRegistry::find
//!     → Ok(Honeytoken)      token triggered
//!     → Err(NotFound)       ordinary miss
//!     → Err(Storage)        treated as a miss by the dispatcher
//! ```
//!
//! # Design Decisions
//! - Exact, case-sensitive match on `url`; no normalization
//! - `url` is unique, so a lookup yields at most one record
//! - A record with id 0 is never returned as a match
//! - Handles are shared read-only across requests via `Arc<dyn TokenRegistry>`

pub mod error;
pub mod memory;
pub mod model;
pub mod sqlite;

use async_trait::async_trait;

pub use error::RegistryError;
pub use memory::MemoryRegistry;
pub use model::{Honeytoken, NewHoneytoken};
pub use sqlite::SqliteRegistry;

/// Read side of the token registry used by the request path.
#[async_trait]
pub trait TokenRegistry: Send + Sync {
    /// Look up the token registered for exactly `url`.
    async fn find(&self, url: &str) -> Result<Honeytoken, RegistryError>;
}
