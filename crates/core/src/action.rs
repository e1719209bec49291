//! Outbound actions and messages.
//!
//! Every side effect a state machine wants — a network send, a timer, an
//! internal event re-enqueue, a notification to a client — is represented
//! as an `Action` value. The runner executes them; the state machines
//! themselves never touch the network, a clock, or a channel directly.

use crate::RequestId;
use chaind_messages::{
    GetBlockInventoryRequest, GetBlockRequest, MstStateGossip, YacCommitGossip, YacFutureGossip,
    YacRejectGossip, YacVoteGossip,
};
use chaind_types::{Batch, Block, BlockHeight, Hash, PeerId, Round};
use std::time::Duration;

/// Outbound network messages a node can send.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    /// MST state diff push.
    MstState(MstStateGossip),
    /// YAC vote broadcast.
    YacVote(YacVoteGossip),
    /// YAC commit evidence broadcast.
    YacCommit(YacCommitGossip),
    /// YAC reject evidence broadcast.
    YacReject(YacRejectGossip),
    /// YAC future-round evidence broadcast.
    YacFuture(YacFutureGossip),
    /// Block inventory request.
    GetBlockInventory(GetBlockInventoryRequest),
    /// Single block fetch request.
    GetBlock(GetBlockRequest),
}

impl OutboundMessage {
    /// A human-readable name for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            OutboundMessage::MstState(_) => "MstState",
            OutboundMessage::YacVote(_) => "YacVote",
            OutboundMessage::YacCommit(_) => "YacCommit",
            OutboundMessage::YacReject(_) => "YacReject",
            OutboundMessage::YacFuture(_) => "YacFuture",
            OutboundMessage::GetBlockInventory(_) => "GetBlockInventory",
            OutboundMessage::GetBlock(_) => "GetBlock",
        }
    }

    /// Whether this is an MST gossip message.
    pub fn is_mst(&self) -> bool {
        matches!(self, OutboundMessage::MstState(_))
    }

    /// Whether this is a YAC consensus message.
    pub fn is_yac(&self) -> bool {
        matches!(
            self,
            OutboundMessage::YacVote(_)
                | OutboundMessage::YacCommit(_)
                | OutboundMessage::YacReject(_)
                | OutboundMessage::YacFuture(_)
        )
    }

    /// Whether this is a synchronization message.
    pub fn is_sync(&self) -> bool {
        matches!(
            self,
            OutboundMessage::GetBlockInventory(_) | OutboundMessage::GetBlock(_)
        )
    }
}

/// Identifies a timer so it can later be cancelled or matched against its
/// firing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// The recurring MST gossip cadence timer.
    MstGossip,
    /// A per-(peer, height) block fetch timeout during synchronization.
    SyncFetchTimeout { peer: PeerId, height: BlockHeight },
    /// Liveness timeout for a YAC round: fires a reject if no commit
    /// evidence arrives before another round is due.
    YacRoundTimeout { round: Round },
}

/// Actions a state machine asks the runner to perform.
#[derive(Debug, Clone)]
pub enum Action {
    /// Send a message to one specific peer.
    SendTo { peer: PeerId, message: OutboundMessage },
    /// Broadcast a message to all known peers.
    Broadcast { message: OutboundMessage },
    /// Arm a timer; when it fires the runner enqueues the associated event.
    SetTimer { id: TimerId, duration: Duration },
    /// Cancel a previously armed timer.
    CancelTimer { id: TimerId },
    /// Re-enqueue an event for processing on the next `handle()` call.
    ///
    /// Used when handling one event produces another (e.g. a completed
    /// batch becoming eligible for proposal) without the runner needing to
    /// understand the dependency.
    EnqueueInternal { event: crate::Event },
    /// A submitted batch was accepted into MST state.
    EmitBatchAccepted { request_id: RequestId, reduced_hash: Hash },
    /// A batch reached its signature quorum.
    EmitBatchCompleted { batch: Batch },
    /// A batch expired before reaching quorum and was dropped.
    EmitBatchExpired { batch: Batch },
    /// A batch was dropped because one of its transactions was finalized
    /// through some other path (committed, or otherwise resolved) and the
    /// in-flight MST copy is no longer useful to propagate.
    EmitBatchFinalized { batch: Batch },
    /// A block was committed by YAC and should be applied to the ledger.
    EmitCommittedBlock { block: Block },
}
