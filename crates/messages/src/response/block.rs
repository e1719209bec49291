//! Block fetch response.

use chaind_types::Block;
use serde::{Deserialize, Serialize};

/// Response to a block fetch request: the block, or `None` if the
/// responding peer does not have it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockResponse {
    /// The requested block, if found.
    pub block: Option<Block>,
}

impl GetBlockResponse {
    /// A response carrying a found block.
    pub fn found(block: Block) -> Self {
        Self { block: Some(block) }
    }

    /// A response for a block the peer does not have.
    pub fn not_found() -> Self {
        Self { block: None }
    }

    /// Whether the block was found.
    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }
}
