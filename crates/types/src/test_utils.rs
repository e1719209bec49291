//! Test-only constructors for fixtures shared across crates.
//!
//! Gated behind the `test-utils` feature so production builds never link
//! them in.

use crate::{AccountId, Batch, BatchType, KeyPair, Transaction};
use std::collections::BTreeMap;

/// Build an unsigned single-transaction batch for a given creator.
pub fn test_batch(creator: &str, quorum: u8) -> Batch {
    Batch {
        transactions: vec![test_transaction(creator, quorum)],
        batch_type: BatchType::Atomic,
    }
}

/// Build an unsigned transaction for a given creator.
pub fn test_transaction(creator: &str, quorum: u8) -> Transaction {
    Transaction {
        creator: AccountId::new(creator).expect("valid test account id"),
        payload: b"test-payload".to_vec(),
        created_at: 1_700_000_000_000,
        quorum,
        signatures: BTreeMap::new(),
    }
}

/// Sign `transaction` in place with a deterministic keypair derived from
/// `seed`, returning the keypair used.
pub fn sign_with_seed(transaction: &mut Transaction, seed: u8) -> KeyPair {
    let keypair = KeyPair::from_seed(&[seed; 32]);
    let message = crate::signing::tx_reduced_hash_message(&transaction.reduced_hash());
    let signature = keypair.sign(&message);
    transaction.signatures.insert(keypair.public_key(), signature);
    keypair
}
