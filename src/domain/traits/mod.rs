//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod prices;

pub use bot::{Bot, BotInfo};
pub use prices::PriceSource;
