use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::User;
use crate::domain::traits::Bot;

/// Service for processing inbound messages and sending replies
pub struct MessageService<B: Bot> {
    bot: B,
    dispatcher: MessageDispatcher,
}

impl<B: Bot> MessageService<B> {
    pub fn new(bot: B, dispatcher: MessageDispatcher) -> Self {
        Self { bot, dispatcher }
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Dispatch one inbound text and send the reply, if any. Returns the reply text.
    pub async fn process(&self, chat_id: &str, text: &str, sender: Option<User>) -> Result<Option<String>, BotError> {
        if let Some(user) = &sender {
            tracing::info!("[{}] {}: {}", chat_id, user, preview(text, 50));
        } else {
            tracing::info!("[{}] {}", chat_id, preview(text, 50));
        }

        let Some(reply) = self.dispatcher.process_text(chat_id, text, sender).await else {
            return Ok(None);
        };

        tracing::info!("Sending response to chat_id {}: {}", chat_id, preview(&reply, 100));
        self.bot.send_message(chat_id, &reply).await?;
        Ok(Some(reply))
    }
}

/// First `max` characters of `text`, safe for multi-byte input
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
