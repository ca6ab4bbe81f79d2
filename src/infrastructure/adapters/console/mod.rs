//! Console adapter for local runs without Telegram

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Reads commands from stdin and prints replies to stdout
pub struct ConsoleAdapter {
    info: BotInfo,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "meteorite-bot".to_string(),
                username: "console".to_string(),
            },
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Next input line, `None` on EOF
    pub async fn read_line(&self) -> Result<Option<String>, BotError> {
        self.lines.lock().await
            .next_line()
            .await
            .map(|line| line.map(|l| l.trim().to_string()))
            .map_err(BotError::Io)
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
