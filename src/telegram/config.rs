use crate::config::{env_or, require_env, require_parse, ConfigError};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_BOT_USERNAME: &str = "Devtectalertbot";

/// Bot credentials and the operator identity
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// The only chat allowed to issue commands; alerts are sent here too
    pub operator_chat_id: i64,
    /// Used for the `/check@<bot>` command alias
    pub bot_username: Option<String>,
    pub api_base_url: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, operator_chat_id: i64) -> Self {
        Self {
            bot_token: bot_token.into(),
            operator_chat_id,
            bot_username: Some(DEFAULT_BOT_USERNAME.to_string()),
            api_base_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Create from environment variables
    /// TELEGRAM_BOT_TOKEN=123:abc (required)
    /// TELEGRAM_USER_ID=987654321 (required)
    /// TELEGRAM_BOT_USERNAME=Devtectalertbot
    /// TELEGRAM_API_URL=https://api.telegram.org
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require_env("TELEGRAM_BOT_TOKEN")?;
        let operator_chat_id = require_parse("TELEGRAM_USER_ID")?;
        let bot_username = env_or("TELEGRAM_BOT_USERNAME", DEFAULT_BOT_USERNAME);
        let api_base_url = env_or("TELEGRAM_API_URL", DEFAULT_API_URL);

        Ok(Self {
            bot_token,
            operator_chat_id,
            bot_username: Some(bot_username.trim_start_matches('@').to_string()),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Bot API method URL, e.g. `.../bot<token>/getUpdates`
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.bot_token, method)
    }
}
