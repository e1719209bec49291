//! Block fetch request.

use crate::response::GetBlockResponse;
use crate::Request;
use chaind_types::BlockHeight;
use serde::{Deserialize, Serialize};

/// Request to fetch a full block by height during synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockRequest {
    /// Height of the requested block.
    pub height: BlockHeight,
}

impl GetBlockRequest {
    /// Create a new block fetch request.
    pub fn new(height: BlockHeight) -> Self {
        Self { height }
    }
}

impl Request for GetBlockRequest {
    type Response = GetBlockResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_block_request() {
        let request = GetBlockRequest::new(BlockHeight(42));
        assert_eq!(request.height, BlockHeight(42));
    }
}
