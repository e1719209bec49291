//! Gossip messages broadcast to peers.

mod mst_state;
mod yac_vote;

pub use mst_state::MstStateGossip;
pub use yac_vote::{YacCommitGossip, YacFutureGossip, YacRejectGossip, YacVoteGossip};
