//! Set-algebraic multi-sig transaction state.

use crate::completer::Completer;
use chaind_types::{Batch, Hash};
use std::collections::BTreeMap;
use std::time::Duration;

/// A stored batch. Expiry is judged from each transaction's own
/// `created_at`, not from when this node happened to observe it, so the
/// entry carries nothing beyond the batch itself.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    batch: Batch,
}

/// The set of partially-signed batches a peer (or this node) is currently
/// tracking, keyed by batch reduced hash.
///
/// `MstState` is a set with two algebraic operations: [`MstState::union`]
/// (merge another state's signatures in) and [`MstState::difference`]
/// (what this state has that another doesn't), mirroring how MST
/// implementations elsewhere express propagation as set algebra rather than
/// message-by-message bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct MstState {
    batches: BTreeMap<Hash, Entry>,
}

/// The result of merging one or more batches into an [`MstState`].
#[derive(Debug, Clone, Default)]
pub struct StateUpdateResult {
    /// Batches that changed (gained a new signature, or were newly
    /// inserted) but are not yet fully signed.
    pub updated: Vec<Batch>,
    /// Batches that reached full signature quorum as a result of this
    /// update.
    pub completed: Vec<Batch>,
}

impl MstState {
    /// An empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches currently tracked.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether no batches are tracked.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// All batches currently tracked, in reduced-hash order.
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values().map(|e| &e.batch)
    }

    /// Whether a batch sharing `batch`'s reduced hash is tracked.
    pub fn contains(&self, batch: &Batch) -> bool {
        self.batches.contains_key(&batch.reduced_hash())
    }

    /// Merge a single batch's signatures into this state.
    ///
    /// If the batch is new, it is inserted outright. If it already exists,
    /// the incoming copy's signatures are unioned into the stored copy (the
    /// reduced hash already guarantees they describe the same
    /// transactions).
    pub fn merge_batch(&mut self, incoming: Batch) -> StateUpdateResult {
        let mut result = StateUpdateResult::default();
        let key = incoming.reduced_hash();

        match self.batches.get_mut(&key) {
            Some(entry) => {
                let before = entry.batch.clone();
                for (tx_before, tx_incoming) in entry.batch.transactions.iter_mut().zip(&incoming.transactions) {
                    tx_before.merge_signatures(tx_incoming);
                }
                if entry.batch != before {
                    if entry.batch.is_fully_signed() {
                        result.completed.push(entry.batch.clone());
                    } else {
                        result.updated.push(entry.batch.clone());
                    }
                }
            }
            None => {
                let fully_signed = incoming.is_fully_signed();
                self.batches.insert(key, Entry { batch: incoming.clone() });
                if fully_signed {
                    result.completed.push(incoming);
                } else {
                    result.updated.push(incoming);
                }
            }
        }

        result
    }

    /// Merge every batch of `other` into this state (the `+` operation).
    pub fn union(&mut self, other: &MstState) -> StateUpdateResult {
        let mut total = StateUpdateResult::default();
        for entry in other.batches.values() {
            let result = self.merge_batch(entry.batch.clone());
            total.updated.extend(result.updated);
            total.completed.extend(result.completed);
        }
        total
    }

    /// Batches in this state that `other` lacks entirely, or has with
    /// strictly fewer signatures (the `-` operation).
    ///
    /// This is what a node gossips to a peer: only the part of its state
    /// the peer doesn't already know about.
    pub fn difference(&self, other: &MstState) -> MstState {
        let mut diff = MstState::new();
        for entry in self.batches.values() {
            let key = entry.batch.reduced_hash();
            let needs_send = match other.batches.get(&key) {
                Some(their) => their.batch.transactions.iter().zip(&entry.batch.transactions).any(
                    |(theirs, ours)| ours.signatures.len() > theirs.signatures.len(),
                ),
                None => true,
            };
            if needs_send {
                diff.batches.insert(key, Entry { batch: entry.batch.clone() });
            }
        }
        diff
    }

    /// Look up a tracked batch by its reduced hash.
    pub fn get(&self, reduced_hash: Hash) -> Option<&Batch> {
        self.batches.get(&reduced_hash).map(|e| &e.batch)
    }

    /// Remove a single batch by reduced hash, if present.
    pub fn remove_batch(&mut self, reduced_hash: Hash) -> Option<Batch> {
        self.batches.remove(&reduced_hash).map(|e| e.batch)
    }

    /// Remove and return every batch that has reached full signature
    /// quorum.
    pub fn take_completed(&mut self) -> Vec<Batch> {
        let keys: Vec<Hash> = self
            .batches
            .iter()
            .filter(|(_, e)| e.batch.is_fully_signed())
            .map(|(k, _)| *k)
            .collect();
        keys.into_iter()
            .filter_map(|k| self.batches.remove(&k).map(|e| e.batch))
            .collect()
    }

    /// Remove and return every batch `completer` considers expired as of
    /// `now`, judged by each batch's own transactions rather than when this
    /// state happened to observe it.
    pub fn take_expired(&mut self, now: Duration, completer: &dyn Completer) -> Vec<Batch> {
        let keys: Vec<Hash> = self
            .batches
            .iter()
            .filter(|(_, e)| completer.is_expired(&e.batch, now))
            .map(|(k, _)| *k)
            .collect();
        keys.into_iter()
            .filter_map(|k| self.batches.remove(&k).map(|e| e.batch))
            .collect()
    }

    /// Drop any batch containing a transaction with the given reduced
    /// hash, returning the dropped batches.
    ///
    /// Called when a transaction is finalized (committed, or otherwise
    /// resolved) through some other path, so its in-flight MST batch is no
    /// longer useful to propagate.
    pub fn erase_transaction(&mut self, reduced_hash: Hash) -> Vec<Batch> {
        let keys: Vec<Hash> = self
            .batches
            .iter()
            .filter(|(_, e)| e.batch.transactions.iter().any(|t| t.reduced_hash() == reduced_hash))
            .map(|(k, _)| *k)
            .collect();
        keys.into_iter()
            .filter_map(|k| self.batches.remove(&k).map(|e| e.batch))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completer::GraceWindowCompleter;
    use chaind_types::test_utils::{sign_with_seed, test_batch};

    #[test]
    fn test_merge_new_batch_is_updated_not_completed() {
        let mut state = MstState::new();
        let batch = test_batch("alice@wonderland", 2);
        let result = state.merge_batch(batch);
        assert_eq!(result.updated.len(), 1);
        assert!(result.completed.is_empty());
    }

    #[test]
    fn test_merge_reaching_quorum_completes() {
        let mut state = MstState::new();
        let mut batch = test_batch("alice@wonderland", 1);
        sign_with_seed(&mut batch.transactions[0], 1);
        let result = state.merge_batch(batch);
        assert_eq!(result.completed.len(), 1);
    }

    #[test]
    fn test_union_merges_signatures_across_states() {
        let mut batch = test_batch("alice@wonderland", 2);
        let mut a_copy = batch.clone();
        let mut b_copy = batch.clone();
        sign_with_seed(&mut a_copy.transactions[0], 1);
        sign_with_seed(&mut b_copy.transactions[0], 2);

        let mut a = MstState::new();
        a.merge_batch(a_copy);
        let mut b = MstState::new();
        b.merge_batch(b_copy);

        let result = a.union(&b);
        assert_eq!(result.completed.len(), 1);
        let _ = &mut batch;
    }

    #[test]
    fn test_difference_is_empty_for_identical_states() {
        let mut a = MstState::new();
        let mut b = MstState::new();
        let batch = test_batch("alice@wonderland", 2);
        a.merge_batch(batch.clone());
        b.merge_batch(batch);

        assert!(a.difference(&b).is_empty());
    }

    #[test]
    fn test_difference_includes_batches_with_more_signatures() {
        let mut batch = test_batch("alice@wonderland", 3);
        let mut a_copy = batch.clone();
        sign_with_seed(&mut a_copy.transactions[0], 1);

        let mut a = MstState::new();
        a.merge_batch(a_copy);
        let mut b = MstState::new();
        b.merge_batch(batch.clone());

        let diff = a.difference(&b);
        assert_eq!(diff.len(), 1);
        let _ = &mut batch;
    }

    #[test]
    fn test_take_expired_respects_grace_window() {
        let completer = GraceWindowCompleter::new(Duration::from_secs(10));
        let mut batch = test_batch("alice@wonderland", 2);
        batch.transactions[0].created_at = 0;
        let mut state = MstState::new();
        state.merge_batch(batch);

        assert!(state.take_expired(Duration::from_secs(5), &completer).is_empty());
        assert_eq!(state.take_expired(Duration::from_secs(15), &completer).len(), 1);
    }

    #[test]
    fn test_take_expired_is_keyed_to_creation_time_regardless_of_merge_time() {
        // Two states merge the same batch at different "observation" times
        // (there is no observation-time parameter anymore); both must agree
        // on expiry purely from the transaction's own `created_at`.
        let completer = GraceWindowCompleter::new(Duration::from_secs(10));
        let mut batch = test_batch("alice@wonderland", 2);
        batch.transactions[0].created_at = 5_000;

        let mut early_observer = MstState::new();
        early_observer.merge_batch(batch.clone());
        let mut late_observer = MstState::new();
        late_observer.merge_batch(batch);

        let now = Duration::from_secs(15);
        assert_eq!(early_observer.take_expired(now, &completer).len(), 1);
        assert_eq!(late_observer.take_expired(now, &completer).len(), 1);
    }

    #[test]
    fn test_erase_transaction_drops_containing_batch() {
        let mut state = MstState::new();
        let batch = test_batch("alice@wonderland", 2);
        let reduced = batch.transactions[0].reduced_hash();
        state.merge_batch(batch);

        let dropped = state.erase_transaction(reduced);
        assert_eq!(dropped.len(), 1);
        assert!(state.is_empty());
    }
}
