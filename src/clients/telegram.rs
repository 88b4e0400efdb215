//! Minimal Telegram Bot API client for long polling.

use super::{ApiError, check_status};
use crate::bot::keyboards::InlineKeyboardMarkup;
use crate::bot::{Event, Reply, Sender};
use crate::config::TelegramConfig;
use crate::domain::UserId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SERVICE: &str = "telegram";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Text messages and button presses become events; everything else
    /// (edits, joins, stickers) is dropped.
    #[must_use]
    pub fn into_event(self) -> Option<Event> {
        if let Some(message) = self.message {
            let from = message.from?;
            let text = message.text?;
            return Some(Event::Message {
                chat_id: message.chat.id,
                sender: Sender {
                    id: UserId::new(from.id),
                    username: from.username,
                    first_name: from.first_name,
                    last_name: from.last_name,
                },
                text,
            });
        }

        let query = self.callback_query?;
        Some(Event::Callback {
            chat_id: query.message.map_or(query.from.id, |m| m.chat.id),
            user_id: UserId::new(query.from.id),
            data: query.data.unwrap_or_default(),
            query_id: query.id,
        })
    }
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    poll_timeout: u64,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, ApiError> {
        // The HTTP timeout must outlast the long-poll window.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_seconds + 10))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
            poll_timeout: config.poll_timeout_seconds,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token)
    }

    async fn call<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::MissingApiKey { service: SERVICE });
        }

        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let text = check_status(SERVICE, response)
            .await?
            .text()
            .await
            .map_err(transport_error)?;

        unwrap_envelope(&text)
    }

    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, ApiError> {
        let request = GetUpdates {
            offset,
            timeout: self.poll_timeout,
            allowed_updates: ["message", "callback_query"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "Received updates");
        }
        Ok(updates)
    }

    pub async fn send(&self, reply: &Reply) -> Result<(), ApiError> {
        let request = SendMessage {
            chat_id: reply.chat_id,
            text: &reply.text,
            reply_markup: reply.keyboard.as_ref().map(|k| k.to_markup()),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    /// Stops the loading spinner on the pressed button.
    pub async fn answer_callback_query(&self, query_id: &str) -> Result<(), ApiError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery {
                    callback_query_id: query_id,
                },
            )
            .await?;
        Ok(())
    }
}

/// Request URLs carry the bot token, so they never reach error messages.
fn transport_error(source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        service: SERVICE,
        source: source.without_url(),
    }
}

fn unwrap_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| ApiError::Decode {
        service: SERVICE,
        message: e.to_string(),
    })?;

    match envelope {
        Envelope {
            ok: true,
            result: Some(result),
            ..
        } => Ok(result),
        Envelope {
            description,
            error_code,
            ..
        } => Err(ApiError::Status {
            service: SERVICE,
            status: error_code.unwrap_or(200),
            body: description.unwrap_or_default(),
        }),
    }
}
