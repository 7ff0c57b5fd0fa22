//! Trust Ledger Persistence
//!
//! Whole-document JSON store for group records and trust edges:
//! - Loaded fully into memory at startup
//! - Mutated in place by the event handlers
//! - Rewritten to disk (atomic rename) after each change
//!
//! The document layout matches `trust_data.json`: a map of groups keyed by
//! decimal chat id plus a flat array of trust edges.

pub mod store;

#[cfg(test)]
mod proptests;

pub use store::{GroupRecord, StoreError, TrustEdge, TrustStore};
