//! Inbound events driving the MST processor, the YAC gate, and the
//! synchronizer.

use crate::RequestId;
use chaind_messages::{GetBlockInventoryResponse, GetBlockResponse, MstStateGossip};
use chaind_types::{
    Batch, Block, BlockHeight, CommitMessage, FutureMessage, Hash, PeerId, RejectMessage, Round,
    YacVote,
};

/// Events the composed node's state machines react to.
#[derive(Debug, Clone)]
pub enum Event {
    /// The periodic MST gossip timer fired; time to push state to the next
    /// peer in rotation.
    MstGossipTimer,
    /// A peer pushed us its MST state diff.
    MstStateReceived { from: PeerId, gossip: MstStateGossip },
    /// A client submitted a (possibly partially-signed) batch.
    SubmitBatch { batch: Batch, request_id: RequestId },
    /// A transaction was finalized by the ledger (committed in a block, or
    /// otherwise no longer relevant) and should be purged from MST state.
    TransactionFinalized { reduced_hash: Hash },
    /// The runner's `PeerTransport.send_state` call for a prior
    /// `Action::SendTo { message: OutboundMessage::MstState(..), .. }`
    /// resolved. On success the pushed batches are recorded as known to
    /// `peer`; on failure `peer_view` is left unchanged so the next gossip
    /// tick retries the same diff.
    MstSendResult { peer: PeerId, batches: Vec<Batch>, success: bool },

    /// A peer broadcast a single YAC vote.
    YacVoteReceived { from: PeerId, vote: YacVote },
    /// A peer broadcast commit evidence.
    YacCommitReceived { from: PeerId, message: CommitMessage },
    /// A peer broadcast reject evidence.
    YacRejectReceived { from: PeerId, message: RejectMessage },
    /// A peer informed us it has moved to a later round.
    YacFutureReceived { from: PeerId, message: FutureMessage },
    /// The node's block proposer produced a candidate for the current
    /// round; the YAC gate should vote on it.
    ProposalReady { round: Round, proposal_hash: Hash, block: Block },
    /// The liveness timer for a round fired without the round resolving.
    YacRoundTimeout { round: Round },

    /// Kick off synchronization toward `target_height`.
    StartSync { target_height: BlockHeight },
    /// A peer responded to a block-inventory request.
    BlockInventoryResponseReceived {
        from: PeerId,
        request_id: RequestId,
        response: GetBlockInventoryResponse,
    },
    /// A peer responded to a block-fetch request.
    BlockResponseReceived {
        from: PeerId,
        request_id: RequestId,
        response: GetBlockResponse,
    },
    /// A block fetch from `from` timed out without a response.
    BlockFetchTimedOut { from: PeerId, height: BlockHeight },
}
