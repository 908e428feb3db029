//! Honeytoken web server library.
//!
//! An HTTP endpoint that answers every request with the same configured decoy
//! response and, when the request target matches a registered honeytoken,
//! alerts an operator out of band.

pub mod alert;
pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notification;
pub mod observability;
pub mod registry;

pub use config::schema::TrapConfig;
pub use http::TrapServer;
pub use lifecycle::Shutdown;
