//! Transactions and multi-signature transaction batches.

use crate::{AccountId, Hash, PublicKey, Signature};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether the transactions in a batch must all land in the same block, in
/// the declared order (`Atomic`), or may be committed independently, with
/// the declared order only binding among those that do land together
/// (`Ordered`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchType {
    /// All transactions commit atomically, in order, or none do.
    Atomic,
    /// Transactions may commit independently; relative order is only
    /// enforced among the subset that commits together.
    Ordered,
}

/// A single transaction, possibly requiring more than one signature before
/// it is eligible for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// The account that created (and is paying for) this transaction.
    pub creator: AccountId,
    /// Opaque command payload; this crate does not interpret command
    /// semantics, only the multi-signature envelope around them.
    pub payload: Vec<u8>,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Number of distinct signatures required before this transaction is
    /// considered fully signed.
    pub quorum: u8,
    /// Signatures collected so far, keyed by signer public key so that
    /// merging two partially-signed copies of the same transaction is a
    /// map union.
    pub signatures: BTreeMap<PublicKey, Signature>,
}

impl Transaction {
    /// Hash of the transaction's content excluding signatures.
    ///
    /// Two copies of "the same" transaction signed by different peers share
    /// a reduced hash; this is the key multi-sig state is organized around.
    pub fn reduced_hash(&self) -> Hash {
        Hash::from_parts(&[
            self.creator.as_str().as_bytes(),
            &self.payload,
            &self.created_at.to_le_bytes(),
            &[self.quorum],
        ])
    }

    /// Number of signatures collected so far.
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Whether enough distinct signatures have been collected.
    pub fn is_fully_signed(&self) -> bool {
        self.signature_count() >= self.quorum as usize
    }

    /// Merge another copy of the same transaction's signatures into this
    /// one. Callers must ensure `other` has the same reduced hash.
    pub fn merge_signatures(&mut self, other: &Transaction) {
        for (key, sig) in &other.signatures {
            self.signatures.entry(*key).or_insert(*sig);
        }
    }
}

/// A batch of transactions submitted together, with a declared ordering
/// policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Transactions in the batch, in the creator's declared order.
    pub transactions: Vec<Transaction>,
    /// Whether the batch is atomic or merely ordered.
    pub batch_type: BatchType,
}

impl Batch {
    /// Hash of the batch as the ordered list of its transactions' reduced
    /// hashes. Two batches with the same members in the same order share a
    /// batch hash even if individual transactions carry different partial
    /// signature sets.
    pub fn reduced_hash(&self) -> Hash {
        let hashes: Vec<Hash> = self.transactions.iter().map(Transaction::reduced_hash).collect();
        let refs: Vec<&[u8]> = hashes.iter().map(|h| h.as_bytes().as_slice()).collect();
        Hash::from_parts(&refs)
    }

    /// Whether every transaction in the batch has collected enough
    /// signatures.
    pub fn is_fully_signed(&self) -> bool {
        self.transactions.iter().all(Transaction::is_fully_signed)
    }
}

/// A batch's declared shape, as advertised by a block proposer for ordering
/// validation: the batch's type plus the ordered list of reduced hashes of
/// the transactions it claims to contain, without the transactions or
/// signatures themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMeta {
    /// Declared ordering policy.
    pub batch_type: BatchType,
    /// Ordered reduced hashes of the batch's claimed members.
    pub reduced_hashes: Vec<Hash>,
}

impl BatchMeta {
    /// Build batch metadata describing an actual batch.
    pub fn describing(batch: &Batch) -> Self {
        Self {
            batch_type: batch.batch_type,
            reduced_hashes: batch.transactions.iter().map(Transaction::reduced_hash).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(creator: &str, payload: &[u8], quorum: u8) -> Transaction {
        Transaction {
            creator: AccountId::new(creator).unwrap(),
            payload: payload.to_vec(),
            created_at: 1000,
            quorum,
            signatures: BTreeMap::new(),
        }
    }

    #[test]
    fn test_reduced_hash_ignores_signatures() {
        let mut a = tx("alice@wonderland", b"cmd", 2);
        let b = a.clone();
        a.signatures.insert(PublicKey::from_bytes([1u8; 32]), Signature::test_zero());
        assert_eq!(a.reduced_hash(), b.reduced_hash());
    }

    #[test]
    fn test_merge_signatures_unions_without_overwrite() {
        let mut a = tx("alice@wonderland", b"cmd", 2);
        let mut b = a.clone();
        let key1 = PublicKey::from_bytes([1u8; 32]);
        let key2 = PublicKey::from_bytes([2u8; 32]);
        a.signatures.insert(key1, Signature::test_zero());
        b.signatures.insert(key2, Signature::test_zero());

        a.merge_signatures(&b);
        assert_eq!(a.signatures.len(), 2);
        assert!(a.is_fully_signed());
    }

    #[test]
    fn test_batch_fully_signed_requires_all_transactions() {
        let mut t1 = tx("alice@wonderland", b"cmd1", 1);
        let t2 = tx("bob@wonderland", b"cmd2", 1);
        t1.signatures.insert(PublicKey::from_bytes([1u8; 32]), Signature::test_zero());

        let batch = Batch {
            transactions: vec![t1, t2],
            batch_type: BatchType::Atomic,
        };
        assert!(!batch.is_fully_signed());
    }
}
