//! Network peer identity.

use crate::{PeerId, PublicKey, VotePower};
use serde::{Deserialize, Serialize};

/// A known validator peer: its identity, its consensus public key, and its
/// voting power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Network identity.
    pub id: PeerId,
    /// Consensus signing key.
    pub public_key: PublicKey,
    /// Voting power held by this peer.
    pub vote_power: VotePower,
}

/// An ordered list of peers, used as the order in which the synchronizer or
/// YAC gate tries peers for a given operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerOrder(pub Vec<Peer>);

impl PeerOrder {
    /// Total voting power across all peers in the order.
    pub fn total_power(&self) -> u64 {
        self.0.iter().map(|p| p.vote_power.get()).sum()
    }

    /// Look up a peer's voting power by id.
    pub fn power_of(&self, id: PeerId) -> Option<VotePower> {
        self.0.iter().find(|p| p.id == id).map(|p| p.vote_power)
    }

    /// Iterate peers in order.
    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.0.iter()
    }
}
