//! Application services - Business logic orchestration

pub mod command_service;
pub mod message_service;
pub mod price_service;

pub use command_service::CommandService;
pub use message_service::MessageService;
pub use price_service::{PriceService, PricesCommand, DEFAULT_PRICE_LIMIT};
