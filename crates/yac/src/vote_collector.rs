//! Accumulates votes for a single YAC round, grouped by the hash they
//! target.

use chaind_types::{PeerId, VotePower, YacHash, YacVote};
use std::collections::BTreeMap;

/// Votes observed so far for one round, keyed by voter so a peer's later
/// vote replaces its earlier one (a peer only ever has one live vote per
/// round).
#[derive(Debug, Clone, Default)]
pub struct VoteCollector {
    votes: BTreeMap<PeerId, YacVote>,
}

impl VoteCollector {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote. Returns `false` if this exact vote (same signer, same
    /// hash) was already recorded.
    pub fn insert(&mut self, vote: YacVote) -> bool {
        match self.votes.get(&vote.signer) {
            Some(existing) if existing.hash == vote.hash => false,
            _ => {
                self.votes.insert(vote.signer, vote);
                true
            }
        }
    }

    /// Number of distinct voters recorded.
    pub fn voter_count(&self) -> usize {
        self.votes.len()
    }

    /// All votes cast so far.
    pub fn votes(&self) -> impl Iterator<Item = &YacVote> {
        self.votes.values()
    }

    /// Votes targeting exactly `hash`.
    pub fn votes_for(&self, hash: YacHash) -> Vec<YacVote> {
        self.votes.values().filter(|v| v.hash == hash).cloned().collect()
    }

    /// Total voting power behind `hash`.
    pub fn power_for(&self, hash: YacHash, power_of: impl Fn(PeerId) -> VotePower) -> u64 {
        self.votes.values().filter(|v| v.hash == hash).map(|v| power_of(v.signer).get()).sum()
    }

    /// The distinct hashes votes have been cast for so far.
    pub fn distinct_hashes(&self) -> Vec<YacHash> {
        let mut hashes: Vec<YacHash> = self.votes.values().map(|v| v.hash).collect();
        hashes.sort_by_key(|h| (h.round, h.proposal_hash, h.block_hash));
        hashes.dedup();
        hashes
    }

    /// Clear all recorded votes, e.g. when moving to a new round.
    pub fn reset(&mut self) {
        self.votes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaind_types::test_utils::test_batch;
    use chaind_types::{BlockHeight, Hash, PublicKey, Round, Signature};

    fn vote(signer: u64, hash: YacHash) -> YacVote {
        let _ = test_batch("alice@wonderland", 1);
        YacVote {
            hash,
            signer: PeerId(signer),
            public_key: PublicKey::from_bytes([signer as u8; 32]),
            signature: Signature::test_zero(),
        }
    }

    fn hash(block_height: u64) -> YacHash {
        YacHash {
            round: Round::first(BlockHeight(block_height)),
            proposal_hash: Hash::from_bytes(b"proposal"),
            block_hash: Hash::from_bytes(b"block"),
        }
    }

    #[test]
    fn test_insert_replaces_same_voter() {
        let mut collector = VoteCollector::new();
        assert!(collector.insert(vote(1, hash(1))));
        assert!(!collector.insert(vote(1, hash(1))));
        assert_eq!(collector.voter_count(), 1);
    }

    #[test]
    fn test_power_for_sums_only_matching_hash() {
        let mut collector = VoteCollector::new();
        collector.insert(vote(1, hash(1)));
        collector.insert(vote(2, hash(2)));

        let power = collector.power_for(hash(1), |_| VotePower::new(1));
        assert_eq!(power, 1);
    }

    #[test]
    fn test_distinct_hashes_deduplicates() {
        let mut collector = VoteCollector::new();
        collector.insert(vote(1, hash(1)));
        collector.insert(vote(2, hash(1)));
        collector.insert(vote(3, hash(2)));

        assert_eq!(collector.distinct_hashes().len(), 2);
    }
}
