//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::legacy::{self, LegacyConfig};
use crate::config::schema::TrapConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a configuration file without validating it.
///
/// Files ending in `.json` are read as JSON, everything else as TOML. A JSON
/// document without any section key is read in the flat legacy layout.
pub fn read_config(path: &Path) -> Result<TrapConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config: TrapConfig = if is_json {
        let document: serde_json::Value = serde_json::from_str(&content)?;
        if legacy::is_legacy(&document) {
            serde_json::from_value::<LegacyConfig>(document)?.into()
        } else {
            serde_json::from_value(document)?
        }
    } else {
        toml::from_str(&content)?
    };

    Ok(config)
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<TrapConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = dir.path().join("ok.txt");
        fs::write(&response, "OK").unwrap();

        let config_path = dir.path().join("trap.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:0\"\n\n[response]\nfile = {:?}\ncontent_type = \"text/plain\"\nstatus_code = 404",
            response.display().to_string()
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.response.status_code, 404);
        assert_eq!(config.response.content_type, "text/plain");
    }

    #[test]
    fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{"response": {"file": "r.xml", "content_type": "text/xml; charset=UTF-8"}}"#,
        )
        .unwrap();

        let config = read_config(&config_path).unwrap();
        assert_eq!(config.response.content_type, "text/xml; charset=UTF-8");
    }

    #[test]
    fn loads_flat_legacy_json() {
        let dir = tempfile::tempdir().unwrap();
        let response = dir.path().join("response.xml");
        fs::write(&response, "<ok/>").unwrap();

        let config_path = dir.path().join("config.json");
        let document = serde_json::json!({
            "verbose": true,
            "interfaceAndPort": "127.0.0.1:50000",
            "responseFile": response.display().to_string(),
            "responseContentType": "text/xml; charset=UTF-8",
            "responseCode": 403,
            "sqliteDatabase": "tokens.db",
            "smtpServer": "mail.example.com",
            "smtpPort": 465,
            "smtpUser": "trap@example.com",
            "smtpPassword": "secret"
        });
        fs::write(&config_path, document.to_string()).unwrap();

        let config = load_config(&config_path).unwrap();
        assert!(config.observability.verbose);
        assert_eq!(config.listener.bind_address, "127.0.0.1:50000");
        assert_eq!(config.response.file, response.display().to_string());
        assert_eq!(config.response.content_type, "text/xml; charset=UTF-8");
        assert_eq!(config.response.status_code, 403);
        assert_eq!(config.registry.database_url, "tokens.db");
        assert!(config.smtp.enabled);
        assert_eq!(config.smtp.host, "mail.example.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.sender(), "trap@example.com");
        assert_eq!(config.smtp.password, "secret");
    }

    #[test]
    fn unknown_json_keys_fail_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        fs::write(&config_path, r#"{"interfaceAndPort": ":50000", "smtpHost": "x"}"#).unwrap();
        assert!(matches!(read_config(&config_path), Err(ConfigError::ParseJson(_))));

        fs::write(&config_path, r#"{"response": {"fiel": "r.xml"}}"#).unwrap();
        assert!(matches!(read_config(&config_path), Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn missing_response_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("trap.toml");
        fs::write(&config_path, "[response]\nfile = \"/nonexistent/decoy.html\"\n").unwrap();

        let err = load_config(&config_path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("decoy.html"));
    }

    #[test]
    fn broken_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("trap.toml");
        fs::write(&config_path, "[listener\n").unwrap();

        assert!(matches!(load_config(&config_path), Err(ConfigError::Parse(_))));
    }
}
