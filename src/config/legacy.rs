//! Flat `config.json` layout of earlier releases.
//!
//! ```json
//! {
//!   "verbose": false,
//!   "interfaceAndPort": "localhost:50000",
//!   "responseFile": "response.xml",
//!   "responseContentType": "text/xml; charset=UTF-8",
//!   "responseCode": 200,
//!   "sqliteDatabase": "honeytokens.db",
//!   "smtpServer": "mail.example.com",
//!   "smtpPort": 587,
//!   "smtpUser": "trap@example.com",
//!   "smtpPassword": "secret"
//! }
//! ```
//!
//! Keys that are present override the defaults of [`TrapConfig`]. A
//! non-empty `smtpServer` turns mail delivery on.

use serde::Deserialize;

use crate::config::schema::{SmtpEncryption, TrapConfig};

/// Section names of the current layout. A JSON object holding none of them
/// is read as the flat layout.
pub const SECTIONS: &[&str] = &[
    "listener",
    "response",
    "registry",
    "smtp",
    "alerts",
    "timeouts",
    "limits",
    "observability",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LegacyConfig {
    pub verbose: Option<bool>,
    pub interface_and_port: Option<String>,
    pub response_file: Option<String>,
    pub response_content_type: Option<String>,
    pub response_code: Option<u16>,
    pub sqlite_database: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

/// Whether a parsed JSON document uses the flat layout.
pub fn is_legacy(document: &serde_json::Value) -> bool {
    document
        .as_object()
        .is_some_and(|object| !SECTIONS.iter().any(|section| object.contains_key(*section)))
}

impl From<LegacyConfig> for TrapConfig {
    fn from(legacy: LegacyConfig) -> Self {
        let mut config = TrapConfig::default();

        if let Some(verbose) = legacy.verbose {
            config.observability.verbose = verbose;
        }
        if let Some(bind_address) = legacy.interface_and_port {
            config.listener.bind_address = bind_address;
        }
        if let Some(file) = legacy.response_file {
            config.response.file = file;
        }
        if let Some(content_type) = legacy.response_content_type {
            config.response.content_type = content_type;
        }
        if let Some(code) = legacy.response_code {
            config.response.status_code = code;
        }
        if let Some(database) = legacy.sqlite_database {
            config.registry.database_url = database;
        }

        if let Some(host) = legacy.smtp_server.filter(|host| !host.trim().is_empty()) {
            config.smtp.enabled = true;
            config.smtp.host = host;
            config.smtp.encryption = SmtpEncryption::Starttls;
        }
        if let Some(port) = legacy.smtp_port {
            config.smtp.port = port;
        }
        if let Some(user) = legacy.smtp_user {
            config.smtp.username = user;
        }
        if let Some(password) = legacy.smtp_password {
            config.smtp.password = password;
        }

        config
    }
}
