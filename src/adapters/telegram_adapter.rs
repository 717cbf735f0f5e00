//! Telegram Bot API delivery adapter.

use crate::adapters::http;
use crate::domain::error::SignalError;
use crate::ports::notify_port::NotifyPort;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    // plain text: no parse_mode, so stray markup cannot fail the request
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
pub struct Updates {
    #[serde(default)]
    pub result: Vec<Value>,
}

pub struct TelegramAdapter {
    client: reqwest::blocking::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramAdapter {
    pub fn new(api_url: &str, bot_token: &str, chat_id: &str) -> Result<Self, SignalError> {
        Ok(Self {
            client: http::build_client()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }

    /// Chat id of the most recent message the bot has received.
    pub fn latest_chat_id(&self) -> Result<Option<i64>, SignalError> {
        let updates: Updates = http::get_json(&self.client, "telegram", &self.method_url("getUpdates"))?;
        Ok(last_chat_id(&updates))
    }
}

pub fn last_chat_id(updates: &Updates) -> Option<i64> {
    updates
        .result
        .last()?
        .get("message")?
        .get("chat")?
        .get("id")?
        .as_i64()
}

impl NotifyPort for TelegramAdapter {
    fn deliver(&self, text: &str) -> Result<(), SignalError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };
        let resp = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .map_err(|e| SignalError::Delivery {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            error!(%status, detail = %detail, "telegram rejected message");
            return Err(SignalError::Delivery {
                reason: format!("HTTP {status}: {detail}"),
            });
        }

        info!(chat_id = %self.chat_id, chars = text.len(), "telegram message sent");
        Ok(())
    }
}
