//! Consolidated alert delivery with a single acknowledgment check

use std::sync::Arc;
use std::time::Duration;

use super::notifier::Notifier;
use super::report::{format_alert, ScopeReport, ACKNOWLEDGED_MESSAGE};
use crate::commands::CommandListener;

/// Result of one alert dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The operator replied `/check` within the wait
    Acknowledged,
    Unacknowledged,
}

/// Sends the consolidated alert, then waits once for `/check`
pub struct AlertDispatcher {
    notifier: Notifier,
    listener: Arc<CommandListener>,
    ack_wait: Duration,
    threshold: f64,
}

impl AlertDispatcher {
    pub fn new(
        notifier: Notifier,
        listener: Arc<CommandListener>,
        ack_wait: Duration,
        threshold: f64,
    ) -> Self {
        Self {
            notifier,
            listener,
            ack_wait,
            threshold,
        }
    }

    /// Deliver the alert for `report` and wait for an acknowledgment
    ///
    /// The inbox is checked exactly once, after `ack_wait`. A `/check`
    /// consumed by the command loop during the wait also counts. Without an
    /// acknowledgment nothing more happens this cycle.
    pub async fn dispatch(&self, report: &ScopeReport) -> DispatchOutcome {
        self.listener.reset_acknowledgment();

        let message = format_alert(report, self.threshold);
        self.notifier.notify_or_log(&message).await;

        tokio::time::sleep(self.ack_wait).await;

        if self.listener.await_acknowledgment().await {
            self.notifier.notify_or_log(ACKNOWLEDGED_MESSAGE).await;
            DispatchOutcome::Acknowledged
        } else {
            tracing::warn!("No response from user, stopping alerts until next cycle");
            DispatchOutcome::Unacknowledged
        }
    }
}
