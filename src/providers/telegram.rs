use crate::core::error::{Result, SyncError};
use crate::core::notify::Notifier;
use crate::providers::util::USER_AGENT;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Sends messages to one chat through the Telegram Bot API.
pub struct TelegramNotifier {
    base_url: String,
    token: String,
    chat_id: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(base_url: &str, token: &str, chat_id: &str, timeout: Duration) -> Self {
        TelegramNotifier {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
            timeout,
        }
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        debug!(chat_id = %self.chat_id, "Sending notification");

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| SyncError::Notify(format!("failed to build client: {e}")))?;

        let response = client
            .post(&url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: message,
            })
            .send()
            .await
            // The URL carries the bot token; keep it out of the error.
            .map_err(|e| SyncError::Notify(format!("request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(SyncError::Notify(format!(
                "HTTP {} from sendMessage",
                response.status()
            )));
        }
        Ok(())
    }
}
