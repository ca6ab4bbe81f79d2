//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, PriceRecord)
//! - Traits: Abstractions for infrastructure (Bot, PriceSource)

pub mod entities;
pub mod traits;
