//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout, tracing, graceful shutdown)
//!     → dispatcher.rs (per-request trap pipeline)
//!         → request.rs (lookup key, headers, body, client address)
//!         → registry lookup, alert on match
//!         → response.rs (the single decoy response)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::AppState;
pub use request::{resolve_client_ip, RequestContext};
pub use response::DecoyResponse;
pub use server::{ServerError, TrapServer};
