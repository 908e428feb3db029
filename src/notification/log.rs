//! Alert "delivery" into the process log, used when no mail relay is configured.

use async_trait::async_trait;

use crate::notification::error::NotifyError;
use crate::notification::Notifier;

/// Writes every alert to the log at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, receiver: &str, message: &str) -> Result<(), NotifyError> {
        tracing::warn!(receiver = %receiver, alert = %message, "Honeytoken triggered");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
