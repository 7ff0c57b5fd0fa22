//! Property-based tests for the trust store
//!
//! Properties:
//! - Dedup: after any sequence of `record_trust` calls, each
//!   `(group, truster, trustee)` triple appears at most once
//! - Round-trip: save then load reproduces identical groups and edges

use super::store::TrustStore;
use crate::telegram::traits::{ChatId, UserId};
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

fn triple_strategy() -> impl Strategy<Value = (i64, i64, i64)> {
    // Small id ranges so duplicate triples actually occur
    (-3i64..0, 1i64..4, 1i64..6)
}

proptest! {
    /// Property: identical triples never produce more than one edge
    #[test]
    fn record_trust_dedups_triples(
        calls in prop::collection::vec(triple_strategy(), 0..40),
    ) {
        let dir = TempDir::new().unwrap();
        let mut store = TrustStore::load(dir.path().join("trust_data.json")).unwrap();

        for (group, truster, trustee) in &calls {
            store
                .record_trust(
                    ChatId(*group),
                    UserId(*truster),
                    "truster",
                    UserId(*trustee),
                    "trustee",
                )
                .unwrap();
        }

        let groups: HashSet<i64> = calls.iter().map(|(g, ..)| *g).collect();
        let mut seen = HashSet::new();
        for group in groups {
            for edge in store.trusts_for_group(ChatId(group)) {
                prop_assert!(
                    seen.insert((edge.group_id, edge.truster_id, edge.trustee_id)),
                    "duplicate triple stored: {:?}",
                    (edge.group_id, edge.truster_id, edge.trustee_id)
                );
                prop_assert_ne!(edge.truster_id, edge.trustee_id, "self-trust stored");
            }
        }
    }

    /// Property: reloading reproduces the exact set of groups and edges
    #[test]
    fn save_load_round_trip(
        groups in prop::collection::vec((-5i64..0, 1i64..100), 0..5),
        calls in prop::collection::vec(triple_strategy(), 0..30),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trust_data.json");
        let mut store = TrustStore::load(&path).unwrap();

        for (group, owner) in &groups {
            store
                .register_group(ChatId(*group), "group", UserId(*owner), "owner")
                .unwrap();
        }
        for (group, truster, trustee) in &calls {
            store
                .record_trust(
                    ChatId(*group),
                    UserId(*truster),
                    "truster",
                    UserId(*trustee),
                    "trustee",
                )
                .unwrap();
        }

        let reloaded = TrustStore::load(&path).unwrap();
        prop_assert_eq!(reloaded.group_count(), store.group_count());
        prop_assert_eq!(reloaded.trust_count(), store.trust_count());
        for (chat, record) in store.groups() {
            prop_assert_eq!(reloaded.group(chat), Some(record));
        }
        for (group, ..) in &calls {
            prop_assert_eq!(
                reloaded.trusts_for_group(ChatId(*group)),
                store.trusts_for_group(ChatId(*group))
            );
        }
    }
}
