//! Telegram Bot API notifier.
//!
//! API docs: https://core.telegram.org/bots/api#sendmessage
//! Endpoint: `POST {base}/bot{token}/sendMessage`
//! Messages use `parse_mode=HTML` (bold and hyperlinks only).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::Notifier;
use crate::types::NewsBotError;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

const CHANNEL: &str = "telegram";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Telegram wraps every response in `{"ok": bool, ...}`.
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    http: Client,
    base_url: String,
    bot_token: SecretString,
    chat_id: String,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: SecretString,
        chat_id: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("stock-news-bot/0.1.0")
            .build()
            .context("Failed to build HTTP client for Telegram")?;

        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            bot_token,
            chat_id,
            disable_web_page_preview: false,
        })
    }

    pub fn with_link_previews(mut self, enabled: bool) -> Self {
        self.disable_web_page_preview = !enabled;
        self
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NewsBotError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.base_url,
            self.bot_token.expose_secret()
        );
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: self.disable_web_page_preview,
        };

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsBotError::notify(CHANNEL, format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            // Telegram puts the reason in `description` even on 4xx
            let reason = serde_json::from_str::<TelegramResponse>(&text)
                .ok()
                .and_then(|r| r.description)
                .unwrap_or(text);
            return Err(NewsBotError::notify(CHANNEL, format!("HTTP {status}: {reason}")));
        }

        match serde_json::from_str::<TelegramResponse>(&text) {
            Ok(r) if r.ok => {
                debug!(chat_id = %self.chat_id, "Telegram message delivered");
                Ok(())
            }
            Ok(r) => Err(NewsBotError::notify(
                CHANNEL,
                r.description.unwrap_or_else(|| "ok=false".to_string()),
            )),
            Err(e) => Err(NewsBotError::notify(CHANNEL, format!("malformed response: {e}"))),
        }
    }
}
