//! Pluggable completion/expiry policy for MST batches.

use chaind_types::Batch;
use std::time::Duration;

/// Decides when a batch is "done" — either because it has collected enough
/// signatures, or because it has sat around long enough to give up on.
///
/// Kept as a trait (rather than hardcoding `Batch::is_fully_signed` and a
/// fixed grace window) because deployments reasonably disagree on how long
/// to wait before dropping an unsigned batch.
pub trait Completer: Send + Sync {
    /// Whether `batch` has collected enough signatures to commit.
    fn is_complete(&self, batch: &Batch) -> bool {
        batch.is_fully_signed()
    }

    /// How long an incomplete batch may sit in state before it is dropped.
    fn grace_window(&self) -> Duration;

    /// Whether `batch` should be dropped as of `now` without having reached
    /// quorum.
    ///
    /// Keyed to each transaction's own `created_at` rather than when this
    /// node happened to first observe the batch: two nodes receive the same
    /// batch at different wall-clock times, and if expiry were measured
    /// from local arrival, a batch could hop from node to node indefinitely,
    /// with each node's grace window restarting on receipt.
    fn is_expired(&self, batch: &Batch, now: Duration) -> bool {
        let grace = self.grace_window();
        batch
            .transactions
            .iter()
            .any(|tx| now.saturating_sub(Duration::from_millis(tx.created_at)) >= grace)
    }
}

/// The default completer: a batch expires once it has been tracked for
/// longer than a fixed grace window.
#[derive(Debug, Clone, Copy)]
pub struct GraceWindowCompleter {
    grace: Duration,
}

impl GraceWindowCompleter {
    /// Build a completer with the given grace window.
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }
}

impl Completer for GraceWindowCompleter {
    fn grace_window(&self) -> Duration {
        self.grace
    }
}
