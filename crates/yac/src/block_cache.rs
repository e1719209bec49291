//! Single-slot cache for a block awaiting YAC commit.
//!
//! A proposer broadcasts a full block once, then the round only exchanges
//! its hash; the cache lets a voting node produce the final committed block
//! without asking the proposer to resend the payload.

use chaind_types::{Block, Hash};

/// Holds at most one block: the current round's candidate.
#[derive(Debug, Default)]
pub struct BlockCache {
    slot: Option<Block>,
}

impl BlockCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a round's candidate block, discarding whatever was cached
    /// before.
    pub fn put(&mut self, block: Block) {
        self.slot = Some(block);
    }

    /// The cached block, if any.
    pub fn get(&self) -> Option<&Block> {
        self.slot.as_ref()
    }

    /// Whether the cached block's hash matches `hash`.
    pub fn matches(&self, hash: Hash) -> bool {
        self.slot.as_ref().is_some_and(|b| b.hash() == hash)
    }

    /// Remove and return the cached block.
    pub fn take(&mut self) -> Option<Block> {
        self.slot.take()
    }

    /// Drop the cached block without returning it, e.g. when moving to a
    /// new round with no carried-forward candidate.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
