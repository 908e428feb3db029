//! Alerting subsystem.
//!
//! # Data Flow
//! ```text
//! matched Honeytoken + RequestContext
//!     → composer.rs (pure rendering to AlertMessage)
//!     → delivery.rs (tokio::spawn, never awaited by the request)
//!     → Notifier (smtp / log)
//! ```

pub mod composer;
pub mod delivery;

pub use composer::{compose_alert, AlertMessage};
pub use delivery::AlertDelivery;
