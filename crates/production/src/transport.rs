//! A minimal [`PeerTransport`] backed by `tokio::sync::mpsc`, standing in
//! for the real wire codec and peer discovery (both out of scope here) well
//! enough to drive several nodes end to end in one process.

use chaind_core::{Event, OutboundMessage};
use chaind_types::PeerId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::warn;

/// A message delivered by one node's transport into another's inbox.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// The peer that sent the message.
    pub from: PeerId,
    /// The message itself.
    pub message: OutboundMessage,
}

/// Abstract collaborator a runner uses to actually deliver the outbound
/// messages a state machine's [`chaind_core::Action`]s ask for. None of
/// `chaind-mst`, `chaind-yac`, or `chaind-sync` touch the network directly;
/// they only ever produce `Action::SendTo`/`Action::Broadcast` for something
/// implementing this trait to execute.
pub trait PeerTransport: Send + Sync {
    /// Deliver a message to one specific peer. Returns whether delivery
    /// succeeded, so the caller can feed the result back into the node
    /// (e.g. `Event::MstSendResult`) for retry on failure.
    fn send_to(&self, peer: PeerId, message: OutboundMessage) -> bool;
    /// Deliver a message to every known peer.
    fn broadcast(&self, message: OutboundMessage);
}

/// An in-process transport: every peer's inbox is an unbounded channel held
/// by the runner driving that peer's node.
pub struct ChannelTransport {
    self_id: PeerId,
    peers: HashMap<PeerId, mpsc::UnboundedSender<InboundMessage>>,
}

impl ChannelTransport {
    /// Build a transport for `self_id`, addressing the given peer inboxes.
    /// `peers` should not include an entry for `self_id`.
    pub fn new(self_id: PeerId, peers: HashMap<PeerId, mpsc::UnboundedSender<InboundMessage>>) -> Self {
        Self { self_id, peers }
    }
}

impl PeerTransport for ChannelTransport {
    fn send_to(&self, peer: PeerId, message: OutboundMessage) -> bool {
        match self.peers.get(&peer) {
            Some(tx) => tx.send(InboundMessage { from: self.self_id, message }).is_ok(),
            None => {
                warn!(?peer, "send_to: no channel registered for peer");
                false
            }
        }
    }

    fn broadcast(&self, message: OutboundMessage) {
        for tx in self.peers.values() {
            let _ = tx.send(InboundMessage { from: self.self_id, message: message.clone() });
        }
    }
}

/// Translate a delivered message into the [`Event`] its recipient's node
/// should handle.
///
/// `GetBlockInventory`/`GetBlock` are requests: answering them needs a peer
/// able to read its own ledger for the requested height, which sits behind
/// a `BlockLoader` abstraction this runner doesn't implement (see crate
/// docs). Only the push-style gossip messages MST and YAC consume end to
/// end are translated; the others are dropped with `None`.
pub fn inbound_to_event(msg: InboundMessage) -> Option<Event> {
    match msg.message {
        OutboundMessage::MstState(gossip) => Some(Event::MstStateReceived { from: msg.from, gossip }),
        OutboundMessage::YacVote(gossip) => Some(Event::YacVoteReceived { from: msg.from, vote: gossip.vote }),
        OutboundMessage::YacCommit(gossip) => {
            Some(Event::YacCommitReceived { from: msg.from, message: gossip.message })
        }
        OutboundMessage::YacReject(gossip) => {
            Some(Event::YacRejectReceived { from: msg.from, message: gossip.message })
        }
        OutboundMessage::YacFuture(gossip) => {
            Some(Event::YacFutureReceived { from: msg.from, message: gossip.message })
        }
        OutboundMessage::GetBlockInventory(_) | OutboundMessage::GetBlock(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaind_messages::{MstStateGossip, YacVoteGossip};
    use chaind_types::test_utils::test_batch;
    use chaind_types::{BlockHeight, PublicKey, Round, Signature, YacHash, YacVote};

    fn vote() -> YacVote {
        YacVote {
            hash: YacHash::nothing(Round::first(BlockHeight(1))),
            signer: PeerId(9),
            public_key: PublicKey::from_bytes([9u8; 32]),
            signature: Signature::test_zero(),
        }
    }

    #[test]
    fn test_send_to_reaches_only_the_addressed_peer() {
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let mut peers = HashMap::new();
        peers.insert(PeerId(1), tx1);
        peers.insert(PeerId(2), tx2);
        let transport = ChannelTransport::new(PeerId(0), peers);

        let gossip = MstStateGossip::new(vec![test_batch("alice@wonderland", 1)]);
        assert!(transport.send_to(PeerId(1), OutboundMessage::MstState(gossip)));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn test_send_to_unknown_peer_reports_failure() {
        let transport = ChannelTransport::new(PeerId(0), HashMap::new());
        let gossip = MstStateGossip::new(vec![test_batch("alice@wonderland", 1)]);
        assert!(!transport.send_to(PeerId(9), OutboundMessage::MstState(gossip)));
    }

    #[test]
    fn test_broadcast_reaches_every_peer() {
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let mut peers = HashMap::new();
        peers.insert(PeerId(1), tx1);
        peers.insert(PeerId(2), tx2);
        let transport = ChannelTransport::new(PeerId(0), peers);

        transport.broadcast(OutboundMessage::YacVote(YacVoteGossip::new(vote())));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_inbound_to_event_translates_mst_state() {
        let gossip = MstStateGossip::new(vec![test_batch("alice@wonderland", 1)]);
        let msg = InboundMessage { from: PeerId(3), message: OutboundMessage::MstState(gossip) };
        let event = inbound_to_event(msg).expect("mst state gossip translates");
        assert!(matches!(event, Event::MstStateReceived { from: PeerId(3), .. }));
    }

    #[test]
    fn test_inbound_to_event_drops_block_requests() {
        let request = chaind_messages::GetBlockRequest::new(BlockHeight(1));
        let msg = InboundMessage { from: PeerId(3), message: OutboundMessage::GetBlock(request) };
        assert!(inbound_to_event(msg).is_none());
    }
}
