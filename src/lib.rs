//! SafeFolks - Trust-Recording Telegram Bot
//!
//! A Telegram bot that records unidirectional "owner trusts member"
//! relationships for groups and persists them to a flat JSON file.
//!
//! Key behaviors:
//! - Group owner resolved via the Bot API (the administrator with
//!   `creator` status)
//! - Trust edges recorded on /scan, on member join, and on group messages
//! - Whole-document JSON store, deduplicated by (group, truster, trustee)

pub mod telegram;
pub mod trust;
