//! Consensus round and vote-target identifiers.

use crate::{BlockHeight, Hash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A consensus round: the block height being agreed on, plus how many times
/// the round has been rejected and restarted at that height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Round {
    /// Block height this round is deciding.
    pub block_height: BlockHeight,
    /// Number of prior rejected rounds at this height.
    pub reject_round: u64,
}

impl Round {
    /// The first round at a given height.
    pub fn first(block_height: BlockHeight) -> Self {
        Self {
            block_height,
            reject_round: 0,
        }
    }

    /// The next round after a rejection, at the same height.
    pub fn next_reject(self) -> Self {
        Self {
            block_height: self.block_height,
            reject_round: self.reject_round + 1,
        }
    }

    /// The first round at the next height, after a commit.
    pub fn next_height(self) -> Self {
        Self::first(self.block_height.next())
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round({}, {})", self.block_height, self.reject_round)
    }
}

/// What a single vote is actually voting for: a round, plus the proposal and
/// resulting block hash (or the zero hash, meaning "nothing", for a reject
/// vote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YacHash {
    /// The round this vote belongs to.
    pub round: Round,
    /// Hash of the proposal being voted on, or [`Hash::ZERO`] for "nothing".
    pub proposal_hash: Hash,
    /// Hash of the resulting block, or [`Hash::ZERO`] for "nothing".
    pub block_hash: Hash,
}

impl YacHash {
    /// Build a vote-for-nothing target for a round (used for reject votes).
    pub fn nothing(round: Round) -> Self {
        Self {
            round,
            proposal_hash: Hash::ZERO,
            block_hash: Hash::ZERO,
        }
    }

    /// Whether this hash represents "vote for nothing".
    pub fn is_none(&self) -> bool {
        self.proposal_hash.is_zero() && self.block_hash.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_progression() {
        let r0 = Round::first(BlockHeight(5));
        assert_eq!(r0.reject_round, 0);

        let r1 = r0.next_reject();
        assert_eq!(r1.block_height, BlockHeight(5));
        assert_eq!(r1.reject_round, 1);

        let next_height = r1.next_height();
        assert_eq!(next_height.block_height, BlockHeight(6));
        assert_eq!(next_height.reject_round, 0);
    }

    #[test]
    fn test_yac_hash_nothing() {
        let nothing = YacHash::nothing(Round::first(BlockHeight(1)));
        assert!(nothing.is_none());

        let voted = YacHash {
            round: Round::first(BlockHeight(1)),
            proposal_hash: Hash::from_bytes(b"proposal"),
            block_hash: Hash::from_bytes(b"block"),
        };
        assert!(!voted.is_none());
    }
}
