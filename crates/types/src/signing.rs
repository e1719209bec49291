//! Domain-separated signing for cryptographic operations.
//!
//! Every signable message type in this crate has a unique domain tag prefix,
//! preventing a signature produced for one context (a transaction, a YAC
//! vote) from being replayed as if it were valid in another.

use crate::{BlockHeight, Hash};

/// Domain tag for a transaction's reduced-hash signature (the signature a
/// peer attaches to a multi-sig transaction it is co-signing).
pub const DOMAIN_TX_REDUCED_HASH: &[u8] = b"mst_tx_reduced:";

/// Domain tag for a YAC vote.
///
/// Format: `yac_vote:` || block_height || reject_round || proposal_hash || block_hash
pub const DOMAIN_YAC_VOTE: &[u8] = b"yac_vote:";

/// Build the signing message for a transaction's reduced hash.
pub fn tx_reduced_hash_message(reduced_hash: &Hash) -> Vec<u8> {
    let mut message = Vec::with_capacity(DOMAIN_TX_REDUCED_HASH.len() + Hash::BYTES);
    message.extend_from_slice(DOMAIN_TX_REDUCED_HASH);
    message.extend_from_slice(reduced_hash.as_bytes());
    message
}

/// Build the signing message for a YAC vote.
pub fn yac_vote_message(
    block_height: BlockHeight,
    reject_round: u64,
    proposal_hash: &Hash,
    block_hash: &Hash,
) -> Vec<u8> {
    let mut message = Vec::with_capacity(DOMAIN_YAC_VOTE.len() + 16 + 2 * Hash::BYTES);
    message.extend_from_slice(DOMAIN_YAC_VOTE);
    message.extend_from_slice(&block_height.0.to_le_bytes());
    message.extend_from_slice(&reject_round.to_le_bytes());
    message.extend_from_slice(proposal_hash.as_bytes());
    message.extend_from_slice(block_hash.as_bytes());
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_reduced_hash_message_deterministic() {
        let hash = Hash::from_bytes(b"tx");
        let msg1 = tx_reduced_hash_message(&hash);
        let msg2 = tx_reduced_hash_message(&hash);
        assert_eq!(msg1, msg2);
        assert!(msg1.starts_with(DOMAIN_TX_REDUCED_HASH));
    }

    #[test]
    fn test_yac_vote_message_deterministic() {
        let proposal = Hash::from_bytes(b"proposal");
        let block = Hash::from_bytes(b"block");

        let msg1 = yac_vote_message(BlockHeight(10), 0, &proposal, &block);
        let msg2 = yac_vote_message(BlockHeight(10), 0, &proposal, &block);

        assert_eq!(msg1, msg2);
        assert!(msg1.starts_with(DOMAIN_YAC_VOTE));
    }

    #[test]
    fn test_different_rounds_produce_different_messages() {
        let proposal = Hash::from_bytes(b"proposal");
        let block = Hash::from_bytes(b"block");

        let round0 = yac_vote_message(BlockHeight(10), 0, &proposal, &block);
        let round1 = yac_vote_message(BlockHeight(10), 1, &proposal, &block);

        assert_ne!(round0, round1);
    }
}
