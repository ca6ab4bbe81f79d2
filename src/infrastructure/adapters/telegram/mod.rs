//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::entities::User as DomainUser;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Extra time on top of the long-poll timeout before the HTTP client gives up
const POLL_MARGIN_SECS: u64 = 10;

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl From<&User> for DomainUser {
    fn from(user: &User) -> Self {
        let mut out = DomainUser::new(user.id.to_string());
        out.username = user.username.clone();
        out.first_name = user.first_name.clone();
        out
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, poll_timeout_secs: u64) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + POLL_MARGIN_SECS))
            .build()
            .map_err(|e| BotError::Network(e.to_string()))?;

        Ok(Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            client,
            info: BotInfo {
                id: "unknown".to_string(),
                name: "meteorite-bot".to_string(),
                username: "meteorite_bot".to_string(),
            },
        })
    }

    /// Use another Bot API host (local Bot API server, mock servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    /// Call a Bot API method and unwrap the `ok`/`result` envelope
    async fn call<Req: Serialize, Res: DeserializeOwned>(&self, method: &str, request: &Req) -> Result<Res, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let data: ApiResponse<Res> = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("{} ({}): {}", method, status, e)))?;

        if !data.ok {
            let description = data.description.unwrap_or_else(|| status.to_string());
            return Err(BotError::Telegram(format!("{}: {}", method, description)));
        }

        data.result
            .ok_or_else(|| BotError::Parse(format!("{}: missing result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct GetMeRequest {}

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let data: BotInfoResponse = self.call("getMe", &GetMeRequest {}).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset, keeping `current` when nothing arrived
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Send a plain text message via Telegram API
    pub async fn send_message_api(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let request = SendMessageRequest { chat_id, text };
        let data: MessageResult = self.call("sendMessage", &request).await?;

        Ok(data.message_id.to_string())
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self, commands: &[(String, String)]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        let request = SetMyCommandsRequest {
            commands: commands.iter()
                .map(|(command, description)| Command { command, description })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", &self.token[..8.min(self.token.len())]);
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        match self.send_message_api(chat_id, text).await {
            Ok(msg_id) => Ok(msg_id),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                Err(e)
            }
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
