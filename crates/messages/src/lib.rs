//! Wire message envelopes.
//!
//! These are the messages a node sends to other nodes; the production
//! runner's `PeerTransport` is responsible for actual network I/O.

pub mod gossip;
pub mod request;
pub mod response;

pub use gossip::{MstStateGossip, YacCommitGossip, YacFutureGossip, YacRejectGossip, YacVoteGossip};
pub use request::{GetBlockInventoryRequest, GetBlockRequest};
pub use response::{GetBlockInventoryResponse, GetBlockResponse};

/// Type-safe request/response pairing, so a caller that sends a `Request`
/// can only be handed back the response type it expects.
pub trait Request {
    /// The response type this request expects.
    type Response;
}
