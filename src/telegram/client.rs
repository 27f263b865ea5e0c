use async_trait::async_trait;
use reqwest::StatusCode;

use super::config::TelegramConfig;
use super::model::{GetUpdatesResponse, SendMessageRequest, Update};

/// Messaging channel used for alerts and operator commands
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send Markdown text to the operator chat
    async fn send_message(&self, text: &str) -> Result<(), TelegramError>;

    /// Fetch inbox updates with `update_id >= offset`
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError>;

    /// Remove any webhook so that polling receives every update
    async fn delete_webhook(&self) -> Result<(), TelegramError>;
}

/// Telegram Bot API client bound to one bot and one operator chat
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http_client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TelegramError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT {
            Err(TelegramError::Conflict(body))
        } else {
            Err(TelegramError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id: self.config.operator_chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .http_client
            .post(self.config.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let response = self
            .http_client
            .get(self.config.method_url("getUpdates"))
            .query(&[("offset", offset)])
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        let body: GetUpdatesResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TelegramError::Deserialization(e.to_string()))?;

        Ok(body.result)
    }

    async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let response = self
            .http_client
            .get(self.config.method_url("deleteWebhook"))
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Network error: {0}")]
    Network(String),

    /// Another poller holds the `getUpdates` session
    #[error("Conflicting getUpdates session: {0}")]
    Conflict(String),

    #[error("Telegram API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl TelegramError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, TelegramError::Conflict(_))
    }
}
