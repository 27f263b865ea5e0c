//! Operator notifications

use std::sync::Arc;

use crate::telegram::{Messenger, TelegramError};

/// Sends report and alert text to the operator chat
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn Messenger>,
}

impl Notifier {
    /// Create a new notifier
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    /// Send a message, returning the transport failure if any
    pub async fn notify(&self, message: &str) -> Result<(), NotifierError> {
        self.messenger.send_message(message).await?;
        tracing::info!(chars = message.chars().count(), "Message sent to Telegram");
        Ok(())
    }

    /// Send a message and log instead of returning failures
    ///
    /// Returns whether the message was delivered.
    pub async fn notify_or_log(&self, message: &str) -> bool {
        match self.notify(message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to send Telegram message");
                false
            }
        }
    }
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Send failed: {0}")]
    Send(#[from] TelegramError),
}
