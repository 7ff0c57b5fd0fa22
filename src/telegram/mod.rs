//! Telegram Bot API Integration Module
//!
//! Implements the trust-recording bot over Bot API long polling:
//! - `traits` defines the client abstraction and wire types
//! - `api` is the production reqwest client
//! - `bot` holds the event loop and command handlers
//! - `mock` replaces the network for tests

pub mod api;
pub mod bot;
pub mod commands;
pub mod group;
pub mod mock;
pub mod retry;
pub mod traits;

pub use api::BotApiClient;
pub use bot::{BotError, SafefolksBot};
pub use mock::MockTelegramClient;
pub use traits::{TelegramClient, TelegramError, TelegramResult};
