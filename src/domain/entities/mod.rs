//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod price;

pub use user::User;
pub use message::{Message, Content};
pub use command::{Command, CommandHandler, CommandRegistry, StaticReply};
pub use price::{Amount, PriceRecord, format_price_lines};
