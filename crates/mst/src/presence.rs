//! Replay protection for inbound MST gossip.

use chaind_types::Hash;
use std::collections::HashMap;

/// Resolution state of a transaction hash, as last reported by the storage
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPresence {
    /// Not yet resolved; eligible to enter MST state.
    Missing,
    /// Already committed to the chain.
    Committed,
    /// Already rejected.
    Rejected,
}

/// Consulted by the MST processor before merging inbound gossip, so a
/// transaction already resolved on-chain cannot re-enter MST state via a
/// peer replaying stale gossip.
pub trait PresenceCache: Send + Sync {
    /// The resolution state of `reduced_hash`, if known.
    fn status(&self, reduced_hash: Hash) -> TxPresence;

    /// Record that `reduced_hash` has been resolved. No-op default for
    /// implementations that only need to stub `status`.
    fn mark_resolved(&mut self, reduced_hash: Hash, resolution: TxPresence) {
        let _ = (reduced_hash, resolution);
    }
}

/// A presence cache backed by an in-memory map. Unknown hashes report
/// `Missing`.
#[derive(Debug, Default)]
pub struct InMemoryPresenceCache {
    resolved: HashMap<Hash, TxPresence>,
}

impl InMemoryPresenceCache {
    /// An empty cache; every hash reports `Missing` until marked otherwise.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresenceCache for InMemoryPresenceCache {
    fn status(&self, reduced_hash: Hash) -> TxPresence {
        self.resolved.get(&reduced_hash).copied().unwrap_or(TxPresence::Missing)
    }

    fn mark_resolved(&mut self, reduced_hash: Hash, resolution: TxPresence) {
        self.resolved.insert(reduced_hash, resolution);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_hash_is_missing() {
        let cache = InMemoryPresenceCache::new();
        assert_eq!(cache.status(Hash::from_parts(&[b"x"])), TxPresence::Missing);
    }

    #[test]
    fn test_marked_hash_reports_resolution() {
        let mut cache = InMemoryPresenceCache::new();
        let hash = Hash::from_parts(&[b"x"]);
        cache.mark_resolved(hash, TxPresence::Rejected);
        assert_eq!(cache.status(hash), TxPresence::Rejected);
    }
}
