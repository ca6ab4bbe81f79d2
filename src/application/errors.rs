//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error(transparent)]
    Ozon(#[from] OzonError),
}

/// Ozon Seller API errors
#[derive(Error, Debug)]
pub enum OzonError {
    #[error("Ozon API is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("authentication failed (HTTP {0})")]
    Auth(u16),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no products returned")]
    Empty,
}

impl From<reqwest::Error> for OzonError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OzonError::Malformed(e.to_string())
        } else {
            OzonError::Transport(e.to_string())
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
