//! Telegram Client Trait Abstractions
//!
//! These types mirror the Bot API wire objects the bot actually consumes.
//! The trait keeps every handler testable via MockTelegramClient.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Telegram chat identifier (groups and supergroups are negative)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telegram user as delivered in updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    /// Display name the way Telegram clients render it (first + last).
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Chat type discriminator from the Bot API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatType {
    /// Trust recording only applies to groups and supergroups.
    pub fn is_group(&self) -> bool {
        matches!(self, ChatType::Group | ChatType::Supergroup)
    }
}

/// Chat a message or member event happened in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    #[serde(rename = "type")]
    pub kind: ChatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Chat {
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// Membership status. `Creator` marks the group owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

/// Member entry as returned by getChatAdministrators / chat_member updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMember {
    pub user: User,
    pub status: MemberStatus,
}

/// Incoming chat message (only the fields the bot consumes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A member's status changed in a chat (join, leave, promotion)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub from: User,
    pub new_chat_member: ChatMember,
}

/// One entry from getUpdates. Exactly one payload field is set per update;
/// updates of kinds we did not subscribe to deserialize with both None.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<TelegramMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_member: Option<ChatMemberUpdated>,
}

/// Result type for Telegram operations
pub type TelegramResult<T> = Result<T, TelegramError>;

/// Telegram client errors
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("network error: {0}")]
    Network(String),

    #[error("Bot API error: {0}")]
    Api(String),

    #[error("unauthorized: bot token rejected by Telegram")]
    Unauthorized,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Telegram Client abstraction for testing
///
/// The production implementation is `BotApiClient` (reqwest over the Bot
/// API); tests use `MockTelegramClient` with scripted updates.
#[async_trait]
pub trait TelegramClient: Clone + Send + Sync {
    /// Identify the bot account. Called once at startup; an invalid token
    /// fails here, before the poll loop starts.
    async fn get_me(&self) -> TelegramResult<User>;

    /// Long-poll for updates past `offset`. Subscribes to `message` and
    /// `chat_member` update kinds.
    async fn get_updates(&self, offset: i64, timeout_secs: u32) -> TelegramResult<Vec<Update>>;

    /// Send a plain-text message to a chat.
    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()>;

    /// Administrators of a chat, creator included. This is the only member
    /// enumeration the Bot API offers.
    async fn chat_administrators(&self, chat: ChatId) -> TelegramResult<Vec<ChatMember>>;

    /// Total member count of a chat.
    async fn chat_member_count(&self, chat: ChatId) -> TelegramResult<u32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_last_name() {
        let user = User {
            id: UserId(1),
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            username: None,
        };
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_without_last_name() {
        let user = User {
            id: UserId(1),
            first_name: "Ada".to_string(),
            last_name: None,
            username: Some("ada".to_string()),
        };
        assert_eq!(user.full_name(), "Ada");
    }

    #[test]
    fn test_chat_type_is_group() {
        assert!(ChatType::Group.is_group());
        assert!(ChatType::Supergroup.is_group());
        assert!(!ChatType::Private.is_group());
        assert!(!ChatType::Channel.is_group());
    }

    #[test]
    fn test_update_deserializes_wire_format() {
        let json = r#"{
            "update_id": 873402,
            "message": {
                "message_id": 42,
                "from": {"id": 111, "first_name": "Ada", "username": "ada"},
                "chat": {"id": -100123, "type": "supergroup", "title": "Safe Folks"},
                "text": "/scan"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.update_id, 873402);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, ChatId(-100123));
        assert_eq!(message.chat.kind, ChatType::Supergroup);
        assert_eq!(message.text.as_deref(), Some("/scan"));
        assert!(update.chat_member.is_none());
    }

    #[test]
    fn test_chat_member_update_deserializes() {
        let json = r#"{
            "update_id": 873403,
            "chat_member": {
                "chat": {"id": -100123, "type": "supergroup", "title": "Safe Folks"},
                "from": {"id": 111, "first_name": "Ada"},
                "new_chat_member": {
                    "user": {"id": 222, "first_name": "Bob"},
                    "status": "member"
                }
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let event = update.chat_member.unwrap();
        assert_eq!(event.new_chat_member.status, MemberStatus::Member);
        assert_eq!(event.new_chat_member.user.id, UserId(222));
    }

    #[test]
    fn test_unsubscribed_update_kind_tolerated() {
        // e.g. an edited_message slipping through deserializes with both
        // payload fields unset instead of failing the whole batch
        let json = r#"{"update_id": 1, "edited_message": {"message_id": 9,
            "chat": {"id": -1, "type": "group"}}}"#;

        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
        assert!(update.chat_member.is_none());
    }
}
