//! Block inventory response.

use chaind_types::{BlockHeight, Hash};
use serde::{Deserialize, Serialize};

/// Response listing available block hashes starting from `starting_height`,
/// plus the responding peer's highest known height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockInventoryResponse {
    /// Hashes available, starting from `starting_height`.
    pub available_blocks: Vec<Hash>,
    /// Height of the first entry in `available_blocks`.
    pub starting_height: BlockHeight,
    /// Highest block height the responding peer has reached.
    pub highest_height: BlockHeight,
}

impl GetBlockInventoryResponse {
    /// Build an inventory response.
    pub fn new(
        available_blocks: Vec<Hash>,
        starting_height: BlockHeight,
        highest_height: BlockHeight,
    ) -> Self {
        Self {
            available_blocks,
            starting_height,
            highest_height,
        }
    }

    /// Look up the hash at a given height, if listed.
    pub fn hash_at_height(&self, height: BlockHeight) -> Option<Hash> {
        if height.0 < self.starting_height.0 {
            return None;
        }
        let index = (height.0 - self.starting_height.0) as usize;
        self.available_blocks.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_at_height() {
        let blocks = vec![Hash::from_bytes(b"b1"), Hash::from_bytes(b"b2")];
        let response = GetBlockInventoryResponse::new(blocks.clone(), BlockHeight(10), BlockHeight(11));

        assert_eq!(response.hash_at_height(BlockHeight(9)), None);
        assert_eq!(response.hash_at_height(BlockHeight(10)), Some(blocks[0]));
        assert_eq!(response.hash_at_height(BlockHeight(11)), Some(blocks[1]));
        assert_eq!(response.hash_at_height(BlockHeight(12)), None);
    }
}
