//! Detached alert delivery.
//!
//! Each alert is handed to its own spawned task that nobody joins. The request
//! that triggered it has usually been answered before delivery starts.
//! Outcomes are only visible in logs and metrics.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::alert::composer::AlertMessage;
use crate::notification::Notifier;
use crate::observability::metrics;

/// Spawns alert deliveries, at most `max_in_flight` at a time.
///
/// Alerts over the limit wait for a slot inside their own task.
#[derive(Clone)]
pub struct AlertDelivery {
    notifier: Arc<dyn Notifier>,
    slots: Arc<Semaphore>,
}

impl AlertDelivery {
    pub fn new(notifier: Arc<dyn Notifier>, max_in_flight: usize) -> Self {
        Self {
            notifier,
            slots: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Start delivering `alert` in the background and return immediately.
    ///
    /// The handle may be dropped; the task keeps running.
    pub fn dispatch(&self, alert: AlertMessage) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let slots = Arc::clone(&self.slots);

        let task = async move {
            let Ok(_slot) = slots.acquire_owned().await else {
                tracing::warn!(token_id = alert.token_id, "Alert slots closed, dropping alert");
                return;
            };

            match notifier.notify(&alert.receiver, &alert.body).await {
                Ok(()) => {
                    tracing::info!(
                        token_id = alert.token_id,
                        receiver = %alert.receiver,
                        channel = notifier.name(),
                        "Alert delivered"
                    );
                    metrics::record_alert(true);
                }
                Err(e) => {
                    tracing::error!(
                        token_id = alert.token_id,
                        receiver = %alert.receiver,
                        channel = notifier.name(),
                        error = %e,
                        "Alert delivery failed"
                    );
                    metrics::record_alert(false);
                }
            }
        };

        tokio::spawn(task.instrument(tracing::Span::current()))
    }

    /// Free delivery slots right now.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}
