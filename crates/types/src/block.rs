//! Committed block representation used by the synchronizer and block cache.

use crate::{Batch, BlockHeight, Hash, PublicKey, Round, Signature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A block header: everything needed to validate a block's place in the
/// chain without inspecting its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Height of this block.
    pub height: BlockHeight,
    /// Hash of the previous block's header.
    pub prev_hash: Hash,
    /// Hash committing to the block's batches.
    pub batches_hash: Hash,
    /// The round that produced this block.
    pub round: Round,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl BlockHeader {
    /// Hash of the header's contents.
    pub fn hash(&self) -> Hash {
        Hash::from_parts(&[
            &self.height.0.to_le_bytes(),
            self.prev_hash.as_bytes(),
            self.batches_hash.as_bytes(),
            &self.round.block_height.0.to_le_bytes(),
            &self.round.reject_round.to_le_bytes(),
            &self.created_at.to_le_bytes(),
        ])
    }
}

/// A full committed block: a header plus the batches it orders, plus the
/// supermajority commit signatures collected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Batches ordered by this block.
    pub batches: Vec<Batch>,
    /// Commit signatures collected during YAC, keyed by signer.
    pub commit_signatures: BTreeMap<PublicKey, Signature>,
}

impl Block {
    /// Hash of the block's header (what peers gossip and vote on).
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Hash committing to the ordered batches, for use in the header.
    pub fn batches_hash(batches: &[Batch]) -> Hash {
        let hashes: Vec<Hash> = batches.iter().map(Batch::reduced_hash).collect();
        let refs: Vec<&[u8]> = hashes.iter().map(|h| h.as_bytes().as_slice()).collect();
        Hash::from_parts(&refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_hash_changes_with_height() {
        let base = BlockHeader {
            height: BlockHeight(1),
            prev_hash: Hash::ZERO,
            batches_hash: Hash::ZERO,
            round: Round::first(BlockHeight(1)),
            created_at: 0,
        };
        let mut other = base.clone();
        other.height = BlockHeight(2);
        other.round = Round::first(BlockHeight(2));

        assert_ne!(base.hash(), other.hash());
    }
}
