use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::config::NotifyConfig;
use crate::error::{Result, WatchError};

/// Delivers a human-readable change message to an operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<()>;

    /// Channel name used in log lines
    fn channel_name(&self) -> &str;
}

/// Telegram destination parsed from `token,chatID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramTarget {
    pub bot_token: String,
    pub chat_id: i64,
}

impl TelegramTarget {
    /// Parse a `token,chatID` spec.
    ///
    /// An empty spec disables notifications, and so does chat ID `0`, which no
    /// Telegram chat uses.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        if input.is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = input.split(',').collect();
        let [token, chat] = parts.as_slice() else {
            return Err(WatchError::Config(format!(
                "expected telegram format 'token,chatID', got: {}",
                input
            )));
        };

        if token.is_empty() {
            return Err(WatchError::Config("telegram bot token is empty".to_string()));
        }
        let chat_id = chat
            .parse::<i64>()
            .map_err(|_| WatchError::Config(format!("invalid telegram chat ID: {}", chat)))?;
        if chat_id == 0 {
            warn!("Telegram chat ID is 0; notifications disabled");
            return Ok(None);
        }

        Ok(Some(Self {
            bot_token: token.to_string(),
            chat_id,
        }))
    }
}

/// Telegram Bot API `sendMessage` notifier.
pub struct TelegramNotifier {
    target: TelegramTarget,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(target: TelegramTarget, config: &NotifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WatchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            target,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.target.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let payload = json!({
            "chat_id": self.target.chat_id,
            "text": message,
        });

        // The endpoint embeds the bot token, so errors are stripped of the URL
        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::Notify(format!("telegram request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WatchError::Notify(format!("telegram error {}: {}", status, error_text)));
        }

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "telegram"
    }
}
