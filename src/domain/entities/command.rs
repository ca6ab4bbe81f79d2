use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Something that can answer a command with reply text
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, message: &Message) -> Result<String, CommandError>;
}

/// Handler that always answers with the same text
pub struct StaticReply(pub String);

#[async_trait]
impl CommandHandler for StaticReply {
    async fn handle(&self, _message: &Message) -> Result<String, CommandError> {
        Ok(self.0.clone())
    }
}

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: Option<Arc<dyn CommandHandler>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_handler(StaticReply(text.into()))
    }

    pub fn matches(&self, input: &str) -> bool {
        self.name.eq_ignore_ascii_case(input)
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    /// Commands sorted by name
    pub fn all(&self) -> Vec<&Command> {
        let mut all: Vec<&Command> = self.commands.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
