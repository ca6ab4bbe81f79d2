//! Message dispatcher - Routes messages to handlers

use crate::application::errors::CommandError;
use crate::application::replies;
use crate::application::services::CommandService;
use crate::domain::entities::{Message, User};
use super::parser::MessageParser;

/// Parses inbound text and turns every command outcome into at most one reply
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self {
            parser: MessageParser::new(commands.prefix()),
            commands,
        }
    }

    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.parser.set_bot_username(username);
        self
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    /// Process a raw text message
    pub async fn process_text(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Option<String> {
        let message = self.parser.parse(chat_id, text, sender);
        self.dispatch(&message).await
    }

    /// Route a parsed message. Failures are logged and become reply text.
    pub async fn dispatch(&self, message: &Message) -> Option<String> {
        match self.commands.handle(message).await {
            Ok(reply) => reply,
            Err(CommandError::NotFound(name)) => {
                tracing::debug!("[{}] Unknown command: {}", message.chat_id, name);
                Some(format!(
                    "{} {}{}\n\n{}",
                    replies::UNKNOWN_COMMAND_PREFIX,
                    self.commands.prefix(),
                    name,
                    self.commands.get_help()
                ))
            }
            Err(CommandError::PermissionDenied) => Some(replies::ACCESS_DENIED.to_string()),
            Err(CommandError::Ozon(e)) => {
                tracing::warn!("[{}] Ozon error: {}", message.chat_id, e);
                Some(format!("{}: {}", replies::OZON_ERROR_PREFIX, e))
            }
            Err(e) => {
                tracing::error!("[{}] Command failed: {}", message.chat_id, e);
                Some(format!("{}: {}", replies::COMMAND_FAILED_PREFIX, e))
            }
        }
    }
}
