//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Operator log (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Nothing recorded here ever reaches the HTTP response
//! - Request ID flows through every event of a request via its span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
