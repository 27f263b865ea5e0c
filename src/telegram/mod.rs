//! Telegram Bot API transport
//!
//! Outbound messages go to the operator chat; inbound commands are read by
//! long-polling `getUpdates` after the webhook has been removed.

pub mod client;
pub mod config;
pub mod model;

pub use client::{Messenger, TelegramClient, TelegramError};
pub use config::TelegramConfig;
pub use model::{Chat, Message, Update};
