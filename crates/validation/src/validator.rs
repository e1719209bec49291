//! Stateless structural validation of an inbound batch.

use crate::{BatchValidationError, ValidationConfig};
use chaind_types::{BatchMeta, BatchType, Transaction};
use std::collections::HashSet;

/// A batch as received off the wire, before it is accepted into any
/// canonical state: the transactions, the declared ordering policy, and the
/// batch meta the sender claims describes them (absent only when the batch
/// is a single transaction with no multi-sig companions).
#[derive(Debug, Clone)]
pub struct IncomingBatch {
    pub transactions: Vec<Transaction>,
    pub batch_type: BatchType,
    pub batch_meta: Option<BatchMeta>,
}

/// Validate a batch's structure against `config`.
///
/// Every applicable check runs regardless of earlier failures; the returned
/// error, if any, carries every reason at once.
pub fn validate_batch(
    config: &ValidationConfig,
    batch: &IncomingBatch,
) -> Result<(), BatchValidationError> {
    let mut reasons = Vec::new();

    if batch.transactions.len() as u64 > config.max_batch_size {
        reasons.push(format!(
            "batch contains too many transactions: {} exceeds the maximum of {}",
            batch.transactions.len(),
            config.max_batch_size
        ));
    }

    let has_signature = batch.transactions.iter().any(|tx| !tx.signatures.is_empty());
    if !has_signature {
        reasons.push("batch has no signatures".to_string());
    }

    if batch.transactions.len() == 1 && batch.batch_meta.is_none() {
        return if reasons.is_empty() {
            Ok(())
        } else {
            Err(BatchValidationError { reasons })
        };
    }

    let Some(meta) = &batch.batch_meta else {
        reasons.push("batch has more than one transaction but no batch meta is attached".to_string());
        return Err(BatchValidationError { reasons });
    };

    let mut seen_meta_hashes = HashSet::new();
    for (i, hash) in meta.reduced_hashes.iter().enumerate() {
        if !seen_meta_hashes.insert(*hash) {
            reasons.push(format!("batch meta reduced hash #{i} is a duplicate"));
        }
    }

    let mut seen_tx_hashes = HashSet::new();
    for (i, tx) in batch.transactions.iter().enumerate() {
        if !seen_tx_hashes.insert(tx.reduced_hash()) {
            reasons.push(format!(
                "transaction #{i} has the same reduced hash as an earlier transaction in the batch"
            ));
        }
    }

    let allow_subsequence =
        batch.batch_type == BatchType::Ordered && config.partial_ordered_batches_are_valid;

    if allow_subsequence {
        if meta.reduced_hashes.len() < batch.transactions.len() {
            reasons.push(
                "batch meta has fewer reduced hashes than transactions present".to_string(),
            );
        }
        // Forward-only subsequence match: each transaction's reduced hash
        // must appear at or after the previous match's position. A hash
        // that only matches an earlier, already-passed position is not a
        // match, it is out of order.
        let mut cursor = 0usize;
        for (i, tx) in batch.transactions.iter().enumerate() {
            let hash = tx.reduced_hash();
            match meta.reduced_hashes[cursor..].iter().position(|h| *h == hash) {
                Some(offset) => cursor += offset + 1,
                None => reasons.push(format!(
                    "transaction #{i} has no corresponding hash in batch meta, or it is out of order"
                )),
            }
        }
    } else {
        if meta.reduced_hashes.len() != batch.transactions.len() {
            reasons.push(format!(
                "batch meta has {} reduced hashes but {} transactions are present",
                meta.reduced_hashes.len(),
                batch.transactions.len()
            ));
        }
        for (i, tx) in batch.transactions.iter().enumerate() {
            let hash = tx.reduced_hash();
            match meta.reduced_hashes.get(i) {
                Some(expected) if *expected == hash => {}
                Some(_) => reasons.push(format!(
                    "transaction #{i} does not match the corresponding batch meta hash"
                )),
                None => reasons.push(format!("transaction #{i} has no corresponding batch meta hash")),
            }
        }
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(BatchValidationError { reasons })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaind_types::{AccountId, PublicKey, Signature};
    use std::collections::BTreeMap;

    fn signed_tx(creator: &str, payload: &[u8], quorum: u8) -> Transaction {
        let mut signatures = BTreeMap::new();
        signatures.insert(PublicKey::from_bytes([9u8; 32]), Signature::test_zero());
        Transaction {
            creator: AccountId::new(creator).unwrap(),
            payload: payload.to_vec(),
            created_at: 1000,
            quorum,
            signatures,
        }
    }

    fn unsigned_tx(creator: &str, payload: &[u8], quorum: u8) -> Transaction {
        Transaction {
            signatures: BTreeMap::new(),
            ..signed_tx(creator, payload, quorum)
        }
    }

    #[test]
    fn test_single_transaction_without_meta_is_valid() {
        let batch = IncomingBatch {
            transactions: vec![signed_tx("alice@wonderland", b"cmd", 1)],
            batch_type: BatchType::Atomic,
            batch_meta: None,
        };
        assert!(validate_batch(&ValidationConfig::default(), &batch).is_ok());
    }

    #[test]
    fn test_no_signatures_is_rejected() {
        let batch = IncomingBatch {
            transactions: vec![unsigned_tx("alice@wonderland", b"cmd", 1)],
            batch_type: BatchType::Atomic,
            batch_meta: None,
        };
        let err = validate_batch(&ValidationConfig::default(), &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("no signatures")));
    }

    #[test]
    fn test_over_max_size_is_rejected() {
        let batch = IncomingBatch {
            transactions: vec![signed_tx("alice@wonderland", b"cmd", 1)],
            batch_type: BatchType::Atomic,
            batch_meta: None,
        };
        let config = ValidationConfig {
            max_batch_size: 0,
            ..ValidationConfig::default()
        };
        let err = validate_batch(&config, &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("too many transactions")));
    }

    #[test]
    fn test_atomic_batch_requires_exact_hash_match() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Atomic,
            reduced_hashes: vec![t1.reduced_hash(), t2.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t2],
            batch_type: BatchType::Atomic,
            batch_meta: Some(meta),
        };
        assert!(validate_batch(&ValidationConfig::default(), &batch).is_ok());
    }

    #[test]
    fn test_atomic_batch_with_missing_transaction_is_rejected() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let t3 = signed_tx("carol@wonderland", b"cmd3", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Atomic,
            reduced_hashes: vec![t1.reduced_hash(), t2.reduced_hash(), t3.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t2],
            batch_type: BatchType::Atomic,
            batch_meta: Some(meta),
        };
        let err = validate_batch(&ValidationConfig::default(), &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("reduced hashes but")));
    }

    #[test]
    fn test_ordered_batch_rejects_partial_without_flag() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let t3 = signed_tx("carol@wonderland", b"cmd3", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Ordered,
            reduced_hashes: vec![t1.reduced_hash(), t2.reduced_hash(), t3.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t3],
            batch_type: BatchType::Ordered,
            batch_meta: Some(meta),
        };
        let config = ValidationConfig {
            partial_ordered_batches_are_valid: false,
            ..ValidationConfig::default()
        };
        assert!(validate_batch(&config, &batch).is_err());
    }

    #[test]
    fn test_ordered_batch_accepts_subsequence_with_flag() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let t3 = signed_tx("carol@wonderland", b"cmd3", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Ordered,
            reduced_hashes: vec![t1.reduced_hash(), t2.reduced_hash(), t3.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t3],
            batch_type: BatchType::Ordered,
            batch_meta: Some(meta),
        };
        let config = ValidationConfig {
            partial_ordered_batches_are_valid: true,
            ..ValidationConfig::default()
        };
        assert!(validate_batch(&config, &batch).is_ok());
    }

    #[test]
    fn test_ordered_batch_rejects_out_of_order_subsequence() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let t3 = signed_tx("carol@wonderland", b"cmd3", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Ordered,
            reduced_hashes: vec![t1.reduced_hash(), t2.reduced_hash(), t3.reduced_hash()],
        };
        // Present in reverse relative order: not a subsequence.
        let batch = IncomingBatch {
            transactions: vec![t3, t1],
            batch_type: BatchType::Ordered,
            batch_meta: Some(meta),
        };
        let config = ValidationConfig {
            partial_ordered_batches_are_valid: true,
            ..ValidationConfig::default()
        };
        let err = validate_batch(&config, &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("out of order")));
    }

    #[test]
    fn test_duplicate_meta_hashes_are_rejected() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let t2 = signed_tx("bob@wonderland", b"cmd2", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Atomic,
            reduced_hashes: vec![t1.reduced_hash(), t1.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t2],
            batch_type: BatchType::Atomic,
            batch_meta: Some(meta),
        };
        let err = validate_batch(&ValidationConfig::default(), &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("duplicate")));
    }

    #[test]
    fn test_duplicate_transactions_in_batch_are_rejected() {
        let t1 = signed_tx("alice@wonderland", b"cmd1", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Atomic,
            reduced_hashes: vec![t1.reduced_hash(), t1.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1.clone(), t1],
            batch_type: BatchType::Atomic,
            batch_meta: Some(meta),
        };
        let err = validate_batch(&ValidationConfig::default(), &batch).unwrap_err();
        assert!(err
            .reasons
            .iter()
            .any(|r| r.contains("same reduced hash as an earlier transaction")));
    }

    #[test]
    fn test_multiple_failures_accumulate_instead_of_short_circuiting() {
        let t1 = unsigned_tx("alice@wonderland", b"cmd1", 1);
        let t2 = unsigned_tx("bob@wonderland", b"cmd2", 1);
        let meta = BatchMeta {
            batch_type: BatchType::Atomic,
            reduced_hashes: vec![t1.reduced_hash()],
        };
        let batch = IncomingBatch {
            transactions: vec![t1, t2],
            batch_type: BatchType::Atomic,
            batch_meta: Some(meta),
        };
        let err = validate_batch(&ValidationConfig::default(), &batch).unwrap_err();
        assert!(err.reasons.iter().any(|r| r.contains("no signatures")));
        assert!(err.reasons.iter().any(|r| r.contains("reduced hashes but")));
    }
}
