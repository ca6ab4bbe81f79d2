use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::replies;
use crate::domain::entities::{Command, CommandRegistry, Content, Message};
use crate::domain::traits::PriceSource;
use super::price_service::{PriceService, PricesCommand};

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    /// Register `/start`, `/ping` and `/prices`
    pub fn register_defaults(&mut self, prices: Option<Arc<dyn PriceSource>>, limit: usize, admin_ids: Vec<String>) {
        self.register(Command::new("start")
            .with_description("Приветствие")
            .with_reply(replies::GREETING));

        self.register(Command::new("ping")
            .with_description("Проверка связи")
            .with_reply(replies::PONG));

        let service = PriceService::new(prices).with_limit(limit);
        self.register(Command::new("prices")
            .with_description(format!("Цены первых {} товаров", service.limit()))
            .with_handler(PricesCommand::new(service, admin_ids)));
    }

    /// Run the matching handler. `Ok(None)` for anything that is not a command.
    pub async fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if let Some(handler) = &cmd.handler {
            Ok(Some(handler.handle(message).await?))
        } else {
            Err(CommandError::ExecutionFailed(format!("Command {} not implemented", cmd.name)))
        }
    }

    /// One line per command, sorted by name
    pub fn get_help(&self) -> String {
        let mut help = "Команды:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("{}{} - {}\n", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help.trim_end().to_string()
    }

    /// Name/description pairs for the Telegram command menu
    pub fn menu(&self) -> Vec<(String, String)> {
        self.registry.all()
            .into_iter()
            .map(|c| (c.name.clone(), c.description.clone().unwrap_or_else(|| c.name.clone())))
            .collect()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
