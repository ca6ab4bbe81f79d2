//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command registry, price lookups, reply delivery
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching
//! - Replies: User-facing texts

pub mod errors;
pub mod messaging;
pub mod replies;
pub mod services;
