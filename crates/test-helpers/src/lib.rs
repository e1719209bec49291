//! Deterministic signed fixtures shared across `chaind` crate test suites.
//!
//! `chaind_types::test_utils` covers single-transaction, single-peer
//! fixtures; this crate builds on top of it for the multi-peer and
//! multi-transaction shapes that MST, YAC, and sync tests reach for
//! repeatedly (a validator set with deterministic keys, a batch signed up to
//! quorum, a batch accompanied by its meta).

use chaind_types::test_utils::test_transaction;
use chaind_types::{Batch, BatchMeta, BatchType, KeyPair, Peer, PeerId, PeerOrder, Transaction, VotePower};

/// Build a deterministic validator set of `count` peers, each with an
/// `ed25519` keypair derived from its index, and equal voting power.
///
/// Returns the peers in order alongside the keypairs used to produce them,
/// so a caller can sign on a given peer's behalf.
pub fn peer_set(count: u64) -> (PeerOrder, Vec<KeyPair>) {
    let mut peers = Vec::with_capacity(count as usize);
    let mut keys = Vec::with_capacity(count as usize);
    for i in 0..count {
        let key = KeyPair::from_seed(&[i as u8; 32]);
        peers.push(Peer {
            id: PeerId(i),
            public_key: key.public_key(),
            vote_power: VotePower::new(1),
        });
        keys.push(key);
    }
    (PeerOrder(peers), keys)
}

/// Build an unsigned batch of `tx_count` distinct transactions for `creator`,
/// each requiring `quorum` signatures. Transactions are given distinct
/// payloads so they don't collide on reduced hash.
pub fn batch(creator: &str, tx_count: usize, quorum: u8, batch_type: BatchType) -> Batch {
    let transactions: Vec<Transaction> = (0..tx_count)
        .map(|i| {
            let mut tx = test_transaction(creator, quorum);
            tx.payload = format!("payload-{i}").into_bytes();
            tx
        })
        .collect();
    Batch { transactions, batch_type }
}

/// Sign every transaction in `batch` up to its declared quorum, using
/// deterministic keys derived from `base_seed + signer index`.
pub fn sign_to_quorum(batch: &mut Batch, base_seed: u8) {
    for tx in &mut batch.transactions {
        for i in 0..tx.quorum {
            let keypair = KeyPair::from_seed(&[base_seed.wrapping_add(i); 32]);
            let message = chaind_types::signing::tx_reduced_hash_message(&tx.reduced_hash());
            let signature = keypair.sign(&message);
            tx.signatures.insert(keypair.public_key(), signature);
        }
    }
}

/// Build the batch meta a proposer would advertise for `batch`.
pub fn meta_for(batch: &Batch) -> BatchMeta {
    BatchMeta::describing(batch)
}
