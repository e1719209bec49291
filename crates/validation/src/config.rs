//! Batch validator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for structural batch validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum number of transactions a batch may contain.
    pub max_batch_size: u64,
    /// Whether an `Ordered` batch may validate against a batch-meta longer
    /// than the transactions actually present, as long as the present
    /// transactions' reduced hashes form a subsequence of the declared
    /// hashes in order. `Atomic` batches always require an exact match
    /// regardless of this setting.
    pub partial_ordered_batches_are_valid: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
            partial_ordered_batches_are_valid: false,
        }
    }
}
