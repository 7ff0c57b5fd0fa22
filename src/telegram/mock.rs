//! Mock Telegram Client for Testing
//!
//! Scripted updates in, recorded messages out. No network.

use super::traits::*;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Mock Telegram client for testing
#[derive(Clone)]
pub struct MockTelegramClient {
    state: Arc<Mutex<MockState>>,
    me: User,
}

#[derive(Default)]
struct MockState {
    sent_messages: Vec<SentMessage>,
    pending_updates: Vec<Update>,
    administrators: HashMap<ChatId, Vec<ChatMember>>,
    member_counts: HashMap<ChatId, u32>,
    admin_failures: HashSet<ChatId>,
    next_update_id: i64,
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat: ChatId,
    pub text: String,
}

impl MockTelegramClient {
    /// Create a mock client whose bot account uses `username`.
    pub fn new(username: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            me: User {
                id: UserId(424242),
                first_name: "SafeFolks".to_string(),
                last_name: None,
                username: Some(username.to_string()),
            },
        }
    }

    /// Queue an incoming text message update.
    pub fn push_message(&self, chat: Chat, from: User, text: &str) {
        let mut state = self.state.lock().unwrap();
        let update_id = state.next_update_id;
        state.next_update_id += 1;
        state.pending_updates.push(Update {
            update_id,
            message: Some(TelegramMessage {
                message_id: update_id,
                from: Some(from),
                chat,
                text: Some(text.to_string()),
            }),
            chat_member: None,
        });
    }

    /// Queue a member-status-change update.
    pub fn push_member_update(&self, chat: Chat, from: User, new_member: ChatMember) {
        let mut state = self.state.lock().unwrap();
        let update_id = state.next_update_id;
        state.next_update_id += 1;
        state.pending_updates.push(Update {
            update_id,
            message: None,
            chat_member: Some(ChatMemberUpdated {
                chat,
                from,
                new_chat_member: new_member,
            }),
        });
    }

    /// Fix the administrator list returned for a chat.
    pub fn set_administrators(&self, chat: ChatId, members: Vec<ChatMember>) {
        self.state
            .lock()
            .unwrap()
            .administrators
            .insert(chat, members);
    }

    /// Fix the member count returned for a chat.
    pub fn set_member_count(&self, chat: ChatId, count: u32) {
        self.state.lock().unwrap().member_counts.insert(chat, count);
    }

    /// Make getChatAdministrators fail for a chat (bot lacks rights).
    pub fn fail_administrators(&self, chat: ChatId) {
        self.state.lock().unwrap().admin_failures.insert(chat);
    }

    /// Get sent messages for assertions.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent_messages.clone()
    }

    /// Get messages sent to a specific chat.
    pub fn sent_to(&self, chat: ChatId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sent_messages
            .iter()
            .filter(|m| m.chat == chat)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Clear all state.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = MockState::default();
    }
}

#[async_trait]
impl TelegramClient for MockTelegramClient {
    async fn get_me(&self) -> TelegramResult<User> {
        Ok(self.me.clone())
    }

    async fn get_updates(&self, offset: i64, _timeout_secs: u32) -> TelegramResult<Vec<Update>> {
        let mut state = self.state.lock().unwrap();
        let drained: Vec<Update> = state.pending_updates.drain(..).collect();
        let (ready, pending): (Vec<Update>, Vec<Update>) =
            drained.into_iter().partition(|u| u.update_id >= offset);
        state.pending_updates = pending;
        Ok(ready)
    }

    async fn send_message(&self, chat: ChatId, text: &str) -> TelegramResult<()> {
        let mut state = self.state.lock().unwrap();
        state.sent_messages.push(SentMessage {
            chat,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn chat_administrators(&self, chat: ChatId) -> TelegramResult<Vec<ChatMember>> {
        let state = self.state.lock().unwrap();
        if state.admin_failures.contains(&chat) {
            return Err(TelegramError::Api(
                "bot is not an administrator of this chat".to_string(),
            ));
        }
        state
            .administrators
            .get(&chat)
            .cloned()
            .ok_or_else(|| TelegramError::Api(format!("chat {chat} not found")))
    }

    async fn chat_member_count(&self, chat: ChatId) -> TelegramResult<u32> {
        let state = self.state.lock().unwrap();
        state
            .member_counts
            .get(&chat)
            .copied()
            .ok_or_else(|| TelegramError::Api(format!("chat {chat} not found")))
    }
}
