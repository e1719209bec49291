//! Per-account index of pending (not yet fully signed) multi-sig batches,
//! queryable with cursor-based pagination.

mod index;

pub use index::{NextBatchInfo, Page, PendingQueryError, PendingTxIndex};
