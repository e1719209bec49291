//! Synchronizer configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for block synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Timeout for an individual block fetch request.
    pub fetch_timeout: Duration,
    /// How many times a slow or truncated peer is retried before switching
    /// to the next peer in rotation. A peer that sends an outright invalid
    /// block is switched away from immediately, without spending a retry.
    pub retries_before_switch: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(5),
            retries_before_switch: 1,
        }
    }
}
