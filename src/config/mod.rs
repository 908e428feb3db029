//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON)
//!     → loader.rs (parse & deserialize)
//!         → legacy.rs (flat camelCase config.json of earlier releases)
//!     → command line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → TrapConfig (validated, immutable)
//!     → handed to subsystems at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the decoy response never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod legacy;
pub mod loader;
pub mod schema;
pub mod validation;

pub use legacy::LegacyConfig;
pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    AlertConfig, LimitsConfig, ListenerConfig, LogFormat, ObservabilityConfig, RegistryConfig,
    ResponseConfig, SmtpConfig, SmtpEncryption, TimeoutConfig, TrapConfig,
};
pub use validation::{validate_config, ValidationError};
