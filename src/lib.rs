//! meteorite-bot - Telegram bot that answers `/start`, `/ping` and `/prices`
//! with product prices from the Ozon Seller API.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod runner;

use std::sync::Arc;

use application::errors::BotError;
use application::messaging::MessageDispatcher;
use application::services::CommandService;
use domain::traits::PriceSource;
use infrastructure::config::Config;
use infrastructure::ozon::OzonClient;

/// Ozon client from config, `None` when credentials are missing
pub fn build_price_source(config: &Config) -> Result<Option<Arc<dyn PriceSource>>, BotError> {
    let Some((client_id, api_key)) = config.ozon.credentials() else {
        tracing::warn!("OZON_CLIENT_ID / OZON_API_KEY not set, /prices is disabled");
        return Ok(None);
    };

    let mut client = OzonClient::new(client_id, api_key, config.ozon.timeout())
        .map_err(|e| BotError::Network(e.to_string()))?;
    if let Some(url) = &config.ozon.api_url {
        client = client.with_base_url(url.as_str());
    }

    Ok(Some(Arc::new(client)))
}

/// Command set and dispatcher for the given config
pub fn build_dispatcher(config: &Config) -> Result<MessageDispatcher, BotError> {
    let prices = build_price_source(config)?;

    let mut commands = CommandService::new(&config.bot.prefix);
    commands.register_defaults(prices, config.ozon.limit, config.admin_ids());

    Ok(MessageDispatcher::new(commands))
}
