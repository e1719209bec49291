//! Multi-sig transaction state gossip.

use chaind_types::Batch;
use serde::{Deserialize, Serialize};

/// Gossips a peer's view of the diff between its own MST state and the
/// recipient's last-known state: batches the recipient is believed not to
/// have yet, or not to have fully signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MstStateGossip {
    /// The batches being propagated.
    pub batches: Vec<Batch>,
}

impl MstStateGossip {
    /// Build a gossip message carrying `batches`.
    pub fn new(batches: Vec<Batch>) -> Self {
        Self { batches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaind_types::test_utils::test_batch;

    #[test]
    fn test_mst_state_gossip_carries_batches() {
        let batch = test_batch("alice@wonderland", 1);
        let gossip = MstStateGossip::new(vec![batch.clone()]);
        assert_eq!(gossip.batches, vec![batch]);
    }
}
