//! Block inventory request, used to discover what a peer has available
//! before fetching full blocks.

use crate::response::GetBlockInventoryResponse;
use crate::Request;
use chaind_types::{BlockHeight, PeerId};
use serde::{Deserialize, Serialize};

/// Request for block inventory from a peer, starting at a given height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockInventoryRequest {
    /// Peer requesting the inventory.
    pub requester: PeerId,
    /// Height the peer should start listing from.
    pub from_height: BlockHeight,
}

impl GetBlockInventoryRequest {
    /// Create a new inventory request.
    pub fn new(requester: PeerId, from_height: BlockHeight) -> Self {
        Self {
            requester,
            from_height,
        }
    }
}

impl Request for GetBlockInventoryRequest {
    type Response = GetBlockInventoryResponse;
}
