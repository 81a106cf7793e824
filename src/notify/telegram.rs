// src/notify/telegram.rs

//! Telegram Bot API channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::notify::Notifier;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends alerts through the Telegram Bot API `sendMessage` endpoint.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token and chat.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("Failed to build Telegram client");
        Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Build from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`, if both are set.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok()?;
        if token.is_empty() || chat_id.is_empty() {
            return None;
        }
        Some(Self::new(token, chat_id))
    }

    fn endpoint(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.token)
    }

    fn payload(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, _subject: &str, body_html: &str, _body_text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&self.payload(body_html))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::notify(
                "telegram",
                format!("API returned {status}: {detail}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_embeds_token() {
        let notifier = TelegramNotifier::new("123:abc", "42");
        assert_eq!(
            notifier.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_shape() {
        let notifier = TelegramNotifier::new("123:abc", "42");
        let payload = notifier.payload("<b>hello</b>");
        assert_eq!(payload["chat_id"], "42");
        assert_eq!(payload["text"], "<b>hello</b>");
        assert_eq!(payload["parse_mode"], "HTML");
    }
}
