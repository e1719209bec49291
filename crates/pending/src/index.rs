//! Per-account pending batch index.
//!
//! Mirrors how a pending-transaction storage component tracks, per account,
//! the batches that account's signatures appear in: an insertion-ordered
//! list (so pagination has a stable order) plus a hash index for O(1)
//! membership and removal lookups. Batches are keyed by their first
//! transaction's reduced hash rather than the batch's own reduced hash, so a
//! cursor names a stable position even as later transactions in the batch
//! pick up more signatures.

use chaind_types::{AccountId, Batch, Hash};
use std::collections::HashMap;
use thiserror::Error;

/// Errors returned when paging through an account's pending batches.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PendingQueryError {
    /// The cursor isn't present in the account's current pending set (it may
    /// have already been removed, or the account has no pending batches at
    /// all).
    #[error("cursor transaction {0} not found in pending set")]
    NotFound(Hash),
}

/// A batch that didn't fit in a page because including it would have split
/// it across a page boundary. A batch is always emitted whole or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextBatchInfo {
    /// First transaction's reduced hash, usable as the next page's cursor.
    pub first_tx_hash: Hash,
    /// Number of transactions in that batch.
    pub batch_size: usize,
}

/// One page of an account's pending batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Batches included whole in this page, in insertion order.
    pub batches: Vec<Batch>,
    /// Total transaction count across every batch currently pending for the
    /// account (not just this page).
    pub total_transactions_size: usize,
    /// The batch that would have been split to fill out this page, if any.
    /// Its `first_tx_hash` is the cursor for the next call.
    pub next_batch_info: Option<NextBatchInfo>,
}

fn first_tx_hash(batch: &Batch) -> Hash {
    batch.transactions[0].reduced_hash()
}

/// One account's insertion-ordered, hash-indexed set of pending batches.
#[derive(Debug, Default)]
struct AccountBatches {
    /// Insertion order, keyed by first-transaction reduced hash.
    order: Vec<Hash>,
    /// first_tx_hash -> batch, for O(1) lookup and removal.
    batches: HashMap<Hash, Batch>,
}

impl AccountBatches {
    fn insert(&mut self, batch: Batch) {
        let key = first_tx_hash(&batch);
        if self.batches.insert(key, batch).is_none() {
            self.order.push(key);
        }
    }

    fn remove(&mut self, reduced_hash: Hash) -> Option<Batch> {
        let key = self
            .batches
            .iter()
            .find(|(_, b)| b.reduced_hash() == reduced_hash)
            .map(|(k, _)| *k)?;
        let removed = self.batches.remove(&key);
        self.order.retain(|h| *h != key);
        removed
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn total_transactions(&self) -> usize {
        self.batches.values().map(|b| b.transactions.len()).sum()
    }

    fn page(&self, cursor: Option<Hash>, page_size: usize) -> Result<Page, PendingQueryError> {
        let start = match cursor {
            None => 0,
            Some(cursor) => self
                .order
                .iter()
                .position(|h| *h == cursor)
                .ok_or(PendingQueryError::NotFound(cursor))?,
        };

        let mut batches = Vec::new();
        let mut emitted = 0usize;
        let mut next_batch_info = None;

        for key in &self.order[start..] {
            let Some(batch) = self.batches.get(key) else { continue };
            let size = batch.transactions.len();
            if emitted + size > page_size {
                next_batch_info = Some(NextBatchInfo { first_tx_hash: *key, batch_size: size });
                break;
            }
            emitted += size;
            batches.push(batch.clone());
        }

        Ok(Page {
            batches,
            total_transactions_size: self.total_transactions(),
            next_batch_info,
        })
    }
}

/// Tracks, per account, the batches currently awaiting signatures that name
/// that account as a creator or signatory.
///
/// Lookups and insertions are synchronous and do not themselves require
/// locking; a node embedding this behind concurrent access wraps it in its
/// own `RwLock` the way other shared, synchronously-mutated components in
/// this workspace do.
#[derive(Debug, Default)]
pub struct PendingTxIndex {
    accounts: HashMap<AccountId, AccountBatches>,
}

impl PendingTxIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `batch` as pending for every account that created one of its
    /// transactions. If an account already has this batch, the stored copy
    /// is replaced in place, preserving list position.
    pub fn insert_batch(&mut self, batch: Batch) {
        let creators: Vec<AccountId> = batch
            .transactions
            .iter()
            .map(|t| t.creator.clone())
            .collect();
        for creator in creators {
            self.accounts.entry(creator).or_default().insert(batch.clone());
        }
    }

    /// Remove a batch (by reduced hash) from every account's pending set,
    /// e.g. once it has been committed, expired out of MST state, or
    /// finalized through some other path.
    pub fn remove_batch(&mut self, reduced_hash: Hash) {
        self.accounts.retain(|_, account| {
            account.remove(reduced_hash);
            !account.is_empty()
        });
    }

    /// Total number of accounts with at least one pending batch.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Page through `account`'s pending transactions in insertion order,
    /// crossing batch boundaries but never splitting a batch across two
    /// pages.
    ///
    /// `cursor`, if given, is the first transaction hash of the batch the
    /// page should resume from. `None` starts from the beginning. A cursor
    /// not present in the account's index is an error, including when the
    /// account itself has no pending batches at all.
    pub fn page_for_account(
        &self,
        account: &AccountId,
        cursor: Option<Hash>,
        page_size: usize,
    ) -> Result<Page, PendingQueryError> {
        match self.accounts.get(account) {
            Some(account_batches) => account_batches.page(cursor, page_size),
            None => match cursor {
                Some(h) => Err(PendingQueryError::NotFound(h)),
                None => Ok(Page::default()),
            },
        }
    }
}
