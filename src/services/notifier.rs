// src/services/notifier.rs

//! Change notification service.
//!
//! Delivers the aggregate change message through the Telegram Bot API.
//! Credentials are injected at construction; the run orchestrator treats
//! a missing notifier as "log and skip".

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::NotifyConfig;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the Telegram chat identifier.
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Trait for notification delivery backends.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a plain-text message.
    ///
    /// `Ok(true)` means the API explicitly confirmed delivery, `Ok(false)`
    /// means it answered but did not confirm. Transport failures are `Err`.
    async fn notify(&self, message: &str) -> Result<bool>;
}

/// Telegram bot credentials.
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    /// Read credentials from the process environment.
    ///
    /// Returns `None` when either variable is unset or empty, which the
    /// caller reports as a skipped notification rather than an error.
    pub fn from_env() -> Option<Self> {
        let bot_token = env::var(BOT_TOKEN_ENV).ok().filter(|v| !v.is_empty())?;
        let chat_id = env::var(CHAT_ID_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Self { bot_token, chat_id })
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    credentials: TelegramCredentials,
    timeout: Duration,
    api_base: String,
}

impl TelegramNotifier {
    /// Create a notifier with the given credentials.
    pub fn new(credentials: TelegramCredentials, config: &NotifyConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            credentials,
            timeout: Duration::from_secs(config.timeout_secs),
            api_base: "https://api.telegram.org".to_string(),
        })
    }

    /// Create a notifier from environment credentials, if present.
    pub fn from_env(config: &NotifyConfig) -> Result<Option<Self>> {
        match TelegramCredentials::from_env() {
            Some(credentials) => Ok(Some(Self::new(credentials, config)?)),
            None => Ok(None),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base, self.credentials.bot_token
        )
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<bool> {
        let payload = SendMessage {
            chat_id: &self.credentials.chat_id,
            text: message,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notify(e.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Telegram response unreadable ({status}): {e}");
                return Ok(false);
            }
        };

        let ok = body
            .get("ok")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        if !ok {
            log::error!("Telegram send failed: {status} {body}");
        }

        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_embeds_token() {
        let notifier = TelegramNotifier::new(
            TelegramCredentials {
                bot_token: "123:abc".into(),
                chat_id: "42".into(),
            },
            &NotifyConfig::default(),
        )
        .unwrap();

        assert_eq!(
            notifier.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_disables_link_preview() {
        let payload = SendMessage {
            chat_id: "42",
            text: "hello",
            disable_web_page_preview: true,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "42");
        assert_eq!(json["disable_web_page_preview"], true);
    }
}
