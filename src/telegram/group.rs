//! Group Owner Resolution
//!
//! The Bot API has no owner field on a chat object; the owner is the
//! administrator whose status is `creator`. A scan resolves the owner and
//! the membership the API can enumerate in one pass.

use super::traits::*;
use tracing::debug;

/// Result of scanning a group: its owner plus everyone the API enumerated.
#[derive(Debug, Clone)]
pub struct GroupScan {
    pub owner: User,
    /// Members visible through getChatAdministrators, owner included.
    /// Plain members of large groups are not enumerable here; they surface
    /// later through join and message events.
    pub members: Vec<ChatMember>,
    pub member_count: u32,
}

/// Resolve a group's owner and visible membership.
///
/// Fails when the bot lacks the rights to list administrators, or when no
/// administrator carries the `creator` status (anonymous owners).
pub async fn scan_group<C: TelegramClient>(client: &C, chat: ChatId) -> TelegramResult<GroupScan> {
    let members = client.chat_administrators(chat).await?;

    let owner = members
        .iter()
        .find(|m| m.status == MemberStatus::Creator)
        .map(|m| m.user.clone())
        .ok_or_else(|| {
            TelegramError::Api(format!(
                "no creator found among administrators of chat {chat}"
            ))
        })?;

    let member_count = client.chat_member_count(chat).await?;
    debug!(
        "scanned chat {}: owner {}, {} admins visible, ~{} members total",
        chat,
        owner.full_name(),
        members.len(),
        member_count
    );

    Ok(GroupScan {
        owner,
        members,
        member_count,
    })
}
