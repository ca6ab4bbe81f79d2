//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::application::services::DEFAULT_PRICE_LIMIT;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub ozon: OzonConfig,
    pub admins: AdminsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "meteorite-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_url: Option<String>,
    /// Long-poll timeout passed to getUpdates
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: None,
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OzonConfig {
    pub client_id: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: u64,
    /// Products shown by /prices
    pub limit: usize,
}

impl Default for OzonConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            api_key: None,
            api_url: None,
            timeout_secs: 30,
            limit: DEFAULT_PRICE_LIMIT,
        }
    }
}

impl OzonConfig {
    /// Client id and API key, when both are set and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let client_id = self.client_id.as_deref().filter(|s| !s.is_empty())?;
        let api_key = self.api_key.as_deref().filter(|s| !s.is_empty())?;
        Some((client_id, api_key))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Telegram user ids allowed to use /prices; empty means everyone
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdminsConfig {
    pub ids: Vec<i64>,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Defaults with environment overrides
    pub fn load_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from process environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`; unset or empty values leave the field alone
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = var("TG_TOKEN").or_else(|| var("BOT_TOKEN")) {
            self.telegram.token = Some(token);
        }
        if let Some(url) = var("TELEGRAM_API_URL") {
            self.telegram.api_url = Some(url);
        }
        if let Some(prefix) = var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
        if let Some(client_id) = var("OZON_CLIENT_ID") {
            self.ozon.client_id = Some(client_id);
        }
        if let Some(api_key) = var("OZON_API_KEY") {
            self.ozon.api_key = Some(api_key);
        }
        if let Some(url) = var("OZON_API_URL") {
            self.ozon.api_url = Some(url);
        }
        if let Some(ids) = var("ADMIN_IDS") {
            self.admins.ids = parse_admin_ids(&ids)?;
        }

        Ok(())
    }

    /// The bot token, or an error naming the variable to set
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.telegram.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField("TG_TOKEN".to_string()))
    }

    /// Admin ids as strings, the form message senders carry
    pub fn admin_ids(&self) -> Vec<String> {
        self.admins.ids.iter().map(|id| id.to_string()).collect()
    }
}

/// Parse a comma-separated id list such as `"1, 2,3"`
pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>()
            .map_err(|_| ConfigError::InvalidValue(format!("ADMIN_IDS: {:?} is not a user id", s))))
        .collect()
}
