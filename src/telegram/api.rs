//! Bot API HTTP Client
//!
//! Thin reqwest wrapper around https://api.telegram.org. Every method call
//! is a POST to `/bot<token>/<method>` answered with the standard
//! `{ok, result, description}` envelope.

use super::traits::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Request timeout. Must sit above the long-poll window passed to
/// getUpdates, or every idle poll turns into a client-side timeout.
const REQUEST_TIMEOUT_SECS: u64 = 90;

/// Production Telegram client over the Bot API.
#[derive(Clone)]
pub struct BotApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Bot API response envelope
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

impl BotApiClient {
    /// Build a client for `token`. The token is not validated here; the
    /// first `get_me` call does that.
    pub fn new(token: &str) -> TelegramResult<Self> {
        Self::with_base_url(token, API_BASE)
    }

    /// Build a client against a non-default API host (test servers).
    pub fn with_base_url(token: &str, base: &str) -> TelegramResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", base.trim_end_matches('/'), token),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> TelegramResult<T> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.to_string()))?;

        // Errors also arrive as a JSON envelope (ok=false), so decode
        // before looking at the HTTP status.
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TelegramError::InvalidResponse(e.to_string()))?;

        if !envelope.ok {
            return Err(match envelope.error_code {
                Some(401) => TelegramError::Unauthorized,
                _ => TelegramError::Api(
                    envelope
                        .description
                        .unwrap_or_else(|| format!("{method} failed")),
                ),
            });
        }

        envelope.result.ok_or_else(|| {
            TelegramError::InvalidResponse(format!("{method}: ok response without result"))
        })
    }
}

#[async_trait]
impl TelegramClient for BotApiClient {
    async fn get_me(&self) -> TelegramResult<User> {
        self.call("getMe", json!({})).await
    }

    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> TelegramResult<Vec<Update>> {
        self.call(
            "getUpdates",
            json!({
                "offset": offset,
                "timeout": timeout_secs,
                // chat_member updates are only delivered when asked for
                "allowed_updates": ["message", "chat_member"],
            }),
        )
        .await
    }

    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()> {
        // The result is the sent Message object; delivery is all we need.
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                json!({ "chat_id": chat.0, "text": text }),
            )
            .await?;
        Ok(())
    }

    async fn chat_administrators(&self, chat: ChatId) -> TelegramResult<Vec<ChatMember>> {
        self.call("getChatAdministrators", json!({ "chat_id": chat.0 }))
            .await
    }

    async fn chat_member_count(&self, chat: ChatId) -> TelegramResult<u32> {
        self.call("getChatMemberCount", json!({ "chat_id": chat.0 }))
            .await
    }
}
