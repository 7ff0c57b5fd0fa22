//! Trust store
//!
//! Contract:
//! - `load()` reads the whole document or starts empty when the file is
//!   missing. A file that exists but does not parse is a hard error: the
//!   store refuses to run against data it would later overwrite.
//! - `save()` rewrites the full document through a sibling temp file and
//!   rename, so a crash mid-write never truncates existing data.
//! - Write failures are retried once; after that the error is surfaced and
//!   the in-memory state stays authoritative until the next successful save.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::telegram::traits::{ChatId, UserId};

/// A registered group and its recorded owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    pub owner_id: UserId,
    pub owner_name: String,
    pub added_at: DateTime<Utc>,
}

/// One directional "truster trusts trustee" edge, scoped to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEdge {
    pub group_id: ChatId,
    pub truster_id: UserId,
    pub truster_name: String,
    pub trustee_id: UserId,
    pub trustee_name: String,
    pub created_at: DateTime<Utc>,
}

/// On-disk document. Groups are keyed by the decimal string form of the
/// chat id (Telegram group ids are negative i64s).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TrustData {
    groups: BTreeMap<String, GroupRecord>,
    trusts: Vec<TrustEdge>,
}

/// Trust store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read trust data '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("trust data '{path}' is corrupt (not valid JSON): {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize trust data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write trust data '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// JSON-backed trust store.
///
/// Handlers receive this as an explicit dependency; there is no global
/// instance. All mutation happens within one handler invocation, so no
/// locking is needed beyond the single-task event loop.
#[derive(Debug)]
pub struct TrustStore {
    path: PathBuf,
    data: TrustData,
}

impl TrustStore {
    /// Load the store from `path`, or start empty if the file is missing.
    ///
    /// A malformed file is a `Corrupt` error, not an empty store: silently
    /// replacing unparseable data would lose every previously recorded edge.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let data = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no trust data at '{}', starting empty", path.display());
                TrustData::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a group with its owner. Re-scanning upserts, which is how
    /// owner reassignment happens.
    pub fn register_group(
        &mut self,
        chat: ChatId,
        name: &str,
        owner_id: UserId,
        owner_name: &str,
    ) -> Result<(), StoreError> {
        self.data.groups.insert(
            chat.to_string(),
            GroupRecord {
                name: name.to_string(),
                owner_id,
                owner_name: owner_name.to_string(),
                added_at: Utc::now(),
            },
        );
        info!("registered group {} ({}) with owner {}", name, chat, owner_name);
        self.save()
    }

    /// Append a trust edge unless the `(group, truster, trustee)` triple is
    /// already recorded. Returns whether an edge was added.
    ///
    /// Self-trust is never recorded.
    pub fn record_trust(
        &mut self,
        chat: ChatId,
        truster_id: UserId,
        truster_name: &str,
        trustee_id: UserId,
        trustee_name: &str,
    ) -> Result<bool, StoreError> {
        if truster_id == trustee_id {
            return Ok(false);
        }

        let exists = self.data.trusts.iter().any(|t| {
            t.group_id == chat && t.truster_id == truster_id && t.trustee_id == trustee_id
        });
        if exists {
            debug!("trust already exists: {} -> {}", truster_name, trustee_name);
            return Ok(false);
        }

        self.data.trusts.push(TrustEdge {
            group_id: chat,
            truster_id,
            truster_name: truster_name.to_string(),
            trustee_id,
            trustee_name: trustee_name.to_string(),
            created_at: Utc::now(),
        });
        info!(
            "recorded trust: {} trusts {} in group {}",
            truster_name, trustee_name, chat
        );
        self.save()?;
        Ok(true)
    }

    /// The registered record for a group, if any.
    pub fn group(&self, chat: ChatId) -> Option<&GroupRecord> {
        self.data.groups.get(&chat.to_string())
    }

    /// All registered groups.
    pub fn groups(&self) -> impl Iterator<Item = (ChatId, &GroupRecord)> {
        self.data
            .groups
            .iter()
            .filter_map(|(key, record)| Some((ChatId(key.parse().ok()?), record)))
    }

    /// Edges for one group, in insertion order.
    pub fn trusts_for_group(&self, chat: ChatId) -> Vec<&TrustEdge> {
        self.data
            .trusts
            .iter()
            .filter(|t| t.group_id == chat)
            .collect()
    }

    pub fn group_count(&self) -> usize {
        self.data.groups.len()
    }

    pub fn trust_count(&self) -> usize {
        self.data.trusts.len()
    }

    /// Rewrite the full document, retrying once on a failed write.
    pub fn save(&self) -> Result<(), StoreError> {
        match self.write_document() {
            Ok(()) => Ok(()),
            Err(first) => {
                warn!("trust data write failed, retrying once: {}", first);
                self.write_document().map_err(|err| {
                    error!("trust data write failed after retry: {}", err);
                    err
                })
            }
        }
    }

    fn write_document(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.data).map_err(StoreError::Serialize)?;

        // Temp file + rename keeps the previous document intact if this
        // process dies mid-write.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}
