//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading (YAML file + environment)
//! - Adapters: Platform integrations (Telegram, console)
//! - Ozon: Seller API client

pub mod adapters;
pub mod config;
pub mod ozon;
