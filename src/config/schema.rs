//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the trap.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the honeytoken server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TrapConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The decoy response served for every request.
    pub response: ResponseConfig,

    /// Token registry location.
    pub registry: RegistryConfig,

    /// SMTP notifier settings.
    pub smtp: SmtpConfig,

    /// Alert fan-out settings.
    pub alerts: AlertConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:20000" or "0.0.0.0:20000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Address handed to the socket layer. An empty host (`:20000`)
    /// listens on all interfaces.
    pub fn socket_address(&self) -> String {
        let bind = self.bind_address.trim();
        match bind.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{port}"),
            None => bind.to_string(),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:20000".to_string(),
        }
    }
}

/// Decoy response configuration.
///
/// Fixed at startup and identical for every request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponseConfig {
    /// File whose bytes are sent as the response body.
    pub file: String,

    /// Value of the `Content-Type` response header.
    pub content_type: String,

    /// HTTP status code (e.g., 200).
    pub status_code: u16,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            file: "response.txt".to_string(),
            content_type: "text/plain; charset=utf-8".to_string(),
            status_code: 200,
        }
    }
}

/// Token registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// SQLite database URL or file path (e.g., "sqlite://honeytokens.db").
    pub database_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://honeytokens.db".to_string(),
        }
    }
}

/// SMTP transport encryption mode.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    /// Opportunistic STARTTLS (usually port 587).
    #[default]
    Starttls,
    /// Implicit TLS (usually port 465).
    Tls,
    /// Plaintext, local relays only.
    None,
}

/// SMTP notifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    /// Deliver alerts by mail. When false, alerts are written to the log.
    pub enabled: bool,

    /// SMTP server host name.
    pub host: String,

    /// SMTP server port.
    pub port: u16,

    /// Login user. Also used as the sender when `from` is empty.
    pub username: String,

    /// Login password.
    pub password: String,

    /// Sender address.
    pub from: String,

    /// Transport encryption.
    pub encryption: SmtpEncryption,

    /// Subject line of alert mails.
    pub subject: String,
}

impl SmtpConfig {
    /// The address alerts are sent from.
    pub fn sender(&self) -> &str {
        if self.from.is_empty() {
            &self.username
        } else {
            &self.from
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            encryption: SmtpEncryption::default(),
            subject: "Honeytoken triggered!".to_string(),
        }
    }
}

/// Alert fan-out configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlertConfig {
    /// Maximum number of alert deliveries running at the same time.
    pub max_in_flight: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { max_in_flight: 32 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 10,
            shutdown_grace_secs: 10,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum request body size buffered for logging and alerts.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Log full request dumps (debug level).
    pub verbose: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: LogFormat::default(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
