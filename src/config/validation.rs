//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the decoy response file is servable
//! - Validate value ranges (timeouts > 0, status codes, ports)
//! - Accept `host:port` bind addresses, including host names and `:port`
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from the response file stat
//! - Runs before config is accepted into the system

use std::net::{Ipv6Addr, SocketAddr};
use std::path::Path;

use thiserror::Error;

use crate::config::schema::TrapConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address is not set")]
    MissingBindAddress,

    #[error("listener.bind_address {0:?} is not a host:port address")]
    InvalidBindAddress(String),

    #[error("response.file is not set")]
    MissingResponseFile,

    #[error("response file {0:?} does not exist or is a directory")]
    ResponseFileUnusable(String),

    #[error("response.content_type is not set")]
    MissingContentType,

    #[error("response.status_code {0} is not a valid HTTP status code")]
    InvalidStatusCode(u16),

    #[error("registry.database_url is not set")]
    MissingDatabaseUrl,

    #[error("smtp.{0} is required when smtp is enabled")]
    MissingSmtpField(&'static str),

    #[error("alerts.max_in_flight must be greater than zero")]
    ZeroAlertConcurrency,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &TrapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bind = config.listener.bind_address.trim();
    if bind.is_empty() {
        errors.push(ValidationError::MissingBindAddress);
    } else if !is_bind_address(&config.listener.socket_address()) {
        errors.push(ValidationError::InvalidBindAddress(bind.to_string()));
    }

    let response = &config.response;
    if response.file.is_empty() {
        errors.push(ValidationError::MissingResponseFile);
    } else if !Path::new(&response.file).is_file() {
        errors.push(ValidationError::ResponseFileUnusable(response.file.clone()));
    }
    if response.content_type.trim().is_empty() {
        errors.push(ValidationError::MissingContentType);
    }
    if !(100..=999).contains(&response.status_code) {
        errors.push(ValidationError::InvalidStatusCode(response.status_code));
    }

    if config.registry.database_url.trim().is_empty() {
        errors.push(ValidationError::MissingDatabaseUrl);
    }

    let smtp = &config.smtp;
    if smtp.enabled {
        if smtp.host.trim().is_empty() {
            errors.push(ValidationError::MissingSmtpField("host"));
        }
        if smtp.port == 0 {
            errors.push(ValidationError::MissingSmtpField("port"));
        }
        if smtp.sender().trim().is_empty() {
            errors.push(ValidationError::MissingSmtpField("from"));
        }
    }

    if config.alerts.max_in_flight == 0 {
        errors.push(ValidationError::ZeroAlertConcurrency);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `host:port` with a `u16` port. The host is a name, an IPv4 address or a
/// bracketed IPv6 address.
fn is_bind_address(address: &str) -> bool {
    let Some((host, port)) = address.rsplit_once(':') else {
        return false;
    };
    if port.parse::<u16>().is_err() {
        return false;
    }

    match host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        Some(ipv6) => ipv6.parse::<Ipv6Addr>().is_ok(),
        None => !host.is_empty() && !host.contains(|c: char| c == ':' || c.is_whitespace()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config(dir: &tempfile::TempDir) -> TrapConfig {
        let file = dir.path().join("ok.txt");
        std::fs::write(&file, "OK").unwrap();

        let mut config = TrapConfig::default();
        config.response.file = file.display().to_string();
        config
    }

    #[test]
    fn default_with_existing_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(validate_config(&valid_config(&dir)), Ok(()));
    }

    #[test]
    fn collects_all_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(&dir);
        config.listener.bind_address = String::new();
        config.response.content_type = " ".into();
        config.response.status_code = 0;
        config.alerts.max_in_flight = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingBindAddress,
                ValidationError::MissingContentType,
                ValidationError::InvalidStatusCode(0),
                ValidationError::ZeroAlertConcurrency,
            ]
        );
    }

    #[test]
    fn host_names_and_empty_hosts_are_bind_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(&dir);

        for bind in ["localhost:20000", ":20000", "0.0.0.0:80", "[::1]:8080"] {
            config.listener.bind_address = bind.into();
            assert_eq!(validate_config(&config), Ok(()), "{bind}");
        }

        for bind in ["localhost", "localhost:", ":70000", "host:port", "::1:8080"] {
            config.listener.bind_address = bind.into();
            assert_eq!(
                validate_config(&config),
                Err(vec![ValidationError::InvalidBindAddress(bind.into())]),
                "{bind}"
            );
        }
    }

    #[test]
    fn directory_is_not_a_response_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(&dir);
        config.response.file = dir.path().display().to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::ResponseFileUnusable(_)));
    }

    #[test]
    fn smtp_fields_required_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(&dir);
        config.smtp.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingSmtpField("host")));
        assert!(errors.contains(&ValidationError::MissingSmtpField("from")));

        config.smtp.host = "mail.example.com".into();
        config.smtp.username = "trap@example.com".into();
        assert_eq!(validate_config(&config), Ok(()));
    }
}
