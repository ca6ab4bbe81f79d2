use super::User;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// An inbound chat message, created per update and dropped once answered
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(chat_id, Content::Command { name: name.into(), args })
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    /// Sender's user id, if the update carried one
    pub fn sender_id(&self) -> Option<&str> {
        self.sender.as_ref().map(|u| u.id.as_str())
    }
}
