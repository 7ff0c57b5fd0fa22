//! SafeFolks Telegram Bot
//!
//! Main bot implementation that:
//! - Long-polls the Bot API for messages and member updates
//! - Handles chat commands (/start, /help, /scan, /status)
//! - Records "owner trusts member" edges into the trust store
//!
//! One update is handled to completion before the next, so the store sees
//! no overlapping mutation.

use super::commands::{parse_command, Command};
use super::group::scan_group;
use super::retry::{is_telegram_error_retryable, retry_with_backoff};
use super::traits::*;
use crate::trust::{StoreError, TrustStore};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Long-poll window passed to getUpdates.
const POLL_TIMEOUT_SECS: u32 = 30;

/// Pause before re-polling after a failed getUpdates call.
const POLL_RETRY_DELAY_SECS: u64 = 3;

/// Errors crossing the bot's handlers (platform or persistence).
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// SafeFolks trust-recording bot.
///
/// The store is injected once at startup and owned by the bot; handlers
/// never touch global state.
pub struct SafefolksBot<C: TelegramClient> {
    client: C,
    store: TrustStore,
    bot_username: String,
    offset: i64,
}

impl<C: TelegramClient> SafefolksBot<C> {
    /// Verify the token and build the bot.
    ///
    /// getMe failing here is deliberate: a bad token stops startup instead
    /// of surfacing as an endless poll-error loop.
    pub async fn connect(client: C, store: TrustStore) -> TelegramResult<Self> {
        let me = client.get_me().await?;
        let bot_username = me
            .username
            .clone()
            .unwrap_or_else(|| me.first_name.clone());
        info!("connected to Telegram as @{}", bot_username);

        Ok(Self {
            client,
            store,
            bot_username,
            offset: 0,
        })
    }

    pub fn store(&self) -> &TrustStore {
        &self.store
    }

    /// Run the update loop. Never returns under normal operation.
    pub async fn run(&mut self) -> TelegramResult<()> {
        info!(
            "watching for updates ({} group(s), {} trust edge(s) loaded)",
            self.store.group_count(),
            self.store.trust_count()
        );

        loop {
            self.poll_once().await;
        }
    }

    /// One getUpdates round: fetch, advance the offset, handle each update.
    ///
    /// A daemon must survive individual update failures, so handler errors
    /// are logged and the loop moves on.
    pub async fn poll_once(&mut self) {
        let updates = match self.client.get_updates(self.offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("error receiving updates, will retry: {}", e);
                tokio::time::sleep(Duration::from_secs(POLL_RETRY_DELAY_SECS)).await;
                return;
            }
        };

        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            if let Err(e) = self.handle_update(update).await {
                warn!("error handling update: {}", e);
            }
        }
    }

    /// Handle one incoming update.
    pub async fn handle_update(&mut self, update: Update) -> Result<(), BotError> {
        if let Some(event) = update.chat_member {
            return self.on_member_updated(event);
        }
        if let Some(message) = update.message {
            return self.on_message(message).await;
        }
        debug!("ignoring update {} without usable payload", update.update_id);
        Ok(())
    }

    async fn on_message(&mut self, message: TelegramMessage) -> Result<(), BotError> {
        let Some(text) = message.text else {
            return Ok(());
        };
        let Some(from) = message.from else {
            return Ok(());
        };

        if text.starts_with('/') {
            return match parse_command(&text, &self.bot_username) {
                Command::Start => self.cmd_start(&message.chat).await,
                Command::Help => self.cmd_help(&message.chat).await,
                Command::Scan => self.cmd_scan(&message.chat).await,
                Command::Status => self.cmd_status(&message.chat).await,
                // Another bot's command or a typo; not even worth a reply
                Command::Unknown(_) => Ok(()),
            };
        }

        self.track_member(&message.chat, &from)
    }

    /// A member's status changed. Joins and promotions count as the member
    /// being observed; leaves and bans carry no trust.
    fn on_member_updated(&mut self, event: ChatMemberUpdated) -> Result<(), BotError> {
        let member = event.new_chat_member;
        if !matches!(
            member.status,
            MemberStatus::Member | MemberStatus::Administrator
        ) {
            return Ok(());
        }
        self.track_member(&event.chat, &member.user)
    }

    /// Record owner→user for a registered group.
    ///
    /// A group that was never scanned is skipped silently: recording an
    /// edge would orphan it against an unregistered group.
    fn track_member(&mut self, chat: &Chat, user: &User) -> Result<(), BotError> {
        if !chat.kind.is_group() {
            return Ok(());
        }

        let Some(group) = self.store.group(chat.id).cloned() else {
            debug!("chat {} not scanned yet, skipping trust check", chat.id);
            return Ok(());
        };

        if group.owner_id == user.id {
            return Ok(());
        }

        self.store.record_trust(
            chat.id,
            group.owner_id,
            &group.owner_name,
            user.id,
            &user.full_name(),
        )?;
        Ok(())
    }

    async fn cmd_start(&self, chat: &Chat) -> Result<(), BotError> {
        let mut text = String::from(
            "👋 Welcome to SafeFolks Bot!\n\n\
             Add me to a group to start recording trust relationships.\n\
             I will record that the group owner trusts all other members.\n\n\
             Commands:\n",
        );
        for (syntax, description) in Command::all_commands() {
            text.push_str(&format!("{} - {}\n", syntax, description));
        }

        self.reply(chat.id, &text).await?;
        Ok(())
    }

    async fn cmd_help(&self, chat: &Chat) -> Result<(), BotError> {
        let mut text = String::from(
            "🤝 SafeFolks Bot Help\n\n\
             This bot records trust relationships in Telegram groups.\n\n\
             How it works:\n\
             1. Add the bot to your group\n\
             2. Run /scan so the bot detects the group owner\n\
             3. The bot records that the owner trusts group members\n\
             4. Members are also recorded as they join or post\n\n\
             Commands:\n",
        );
        for (syntax, description) in Command::all_commands() {
            text.push_str(&format!("{} - {}\n", syntax, description));
        }
        text.push_str("\nNote: only the group owner's trust is recorded (not vice versa).");

        self.reply(chat.id, &text).await?;
        Ok(())
    }

    /// Register the group, then record an edge for every visible non-owner
    /// member.
    async fn cmd_scan(&mut self, chat: &Chat) -> Result<(), BotError> {
        if !chat.kind.is_group() {
            self.reply(
                chat.id,
                "This command only works in groups.\nAdd me to a group first.",
            )
            .await?;
            return Ok(());
        }

        let scan = match scan_group(&self.client, chat.id).await {
            Ok(scan) => scan,
            Err(e) => {
                warn!("scan of chat {} failed: {}", chat.id, e);
                self.reply(
                    chat.id,
                    &format!(
                        "❌ Error scanning group: {}\nMake sure the bot has admin privileges.",
                        e
                    ),
                )
                .await?;
                return Ok(());
            }
        };

        let owner_name = scan.owner.full_name();
        self.store
            .register_group(chat.id, chat.display_name(), scan.owner.id, &owner_name)?;

        let mut recorded = 0;
        for member in scan.members.iter().filter(|m| m.user.id != scan.owner.id) {
            let added = self.store.record_trust(
                chat.id,
                scan.owner.id,
                &owner_name,
                member.user.id,
                &member.user.full_name(),
            )?;
            if added {
                recorded += 1;
            }
        }

        let reply = format!(
            "✅ Group registered!\n\n\
             👑 Owner: {}\n\
             👥 Members: ~{}\n\n\
             Recorded {} new trust relationship(s) from the visible member list.\n\
             Remaining members are recorded as they join or post.",
            owner_name, scan.member_count, recorded
        );
        self.reply(chat.id, &reply).await?;
        Ok(())
    }

    async fn cmd_status(&self, chat: &Chat) -> Result<(), BotError> {
        if !chat.kind.is_group() {
            self.reply(
                chat.id,
                "This command only works in groups.\nAdd me to a group to see trust information.",
            )
            .await?;
            return Ok(());
        }

        let Some(group) = self.store.group(chat.id) else {
            self.reply(
                chat.id,
                "⚠️ This group is not registered yet.\nPlease use /scan to scan group members.",
            )
            .await?;
            return Ok(());
        };

        let trusts = self.store.trusts_for_group(chat.id);
        let mut text = format!(
            "📊 Trust status for {}\n\n\
             👑 Owner: {}\n\
             🤝 Trust relationships: {}\n\n",
            chat.display_name(),
            group.owner_name,
            trusts.len()
        );

        if trusts.is_empty() {
            text.push_str("No trust relationships recorded yet.\nUse /scan to scan group members.");
        } else {
            for trust in &trusts {
                text.push_str(&format!("• {} → {}\n", trust.truster_name, trust.trustee_name));
            }
        }

        self.reply(chat.id, &text).await?;
        Ok(())
    }

    /// Send a reply, retrying transient network failures.
    async fn reply(&self, chat: ChatId, text: &str) -> TelegramResult<()> {
        retry_with_backoff(
            || self.client.send_message(chat, text),
            is_telegram_error_retryable,
        )
        .await
    }
}
