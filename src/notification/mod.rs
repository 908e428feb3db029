//! Alert delivery channels.
//!
//! A `Notifier` takes a destination address and a rendered alert and tries
//! to deliver it. It may be slow or fail; callers run it off the request
//! path and only log the outcome. Retry policy, if any, belongs to the
//! implementation.

pub mod error;
pub mod log;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SmtpConfig;

pub use error::NotifyError;
pub use log::LogNotifier;
pub use smtp::SmtpNotifier;

/// Delivers an alert message to a destination address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, receiver: &str, message: &str) -> Result<(), NotifyError>;

    /// Short channel name for logs.
    fn name(&self) -> &'static str;
}

/// Pick the notifier for the configuration: SMTP when enabled, the log otherwise.
pub fn from_config(config: &SmtpConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    if config.enabled {
        Ok(Arc::new(SmtpNotifier::new(config)?))
    } else {
        Ok(Arc::new(LogNotifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_smtp_falls_back_to_log() {
        let notifier = from_config(&SmtpConfig::default()).unwrap();
        assert_eq!(notifier.name(), "log");
    }

    #[test]
    fn enabled_smtp_builds_mail_notifier() {
        let config = SmtpConfig {
            enabled: true,
            host: "localhost".into(),
            from: "trap@example.com".into(),
            ..SmtpConfig::default()
        };
        assert_eq!(from_config(&config).unwrap().name(), "smtp");
    }
}
