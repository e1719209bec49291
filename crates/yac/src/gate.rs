//! The YAC voting gate: drives one round of voting to a commit or reject
//! outcome, then advances to the next round.

use crate::block_cache::BlockCache;
use crate::vote_collector::VoteCollector;
use chaind_core::{Action, Event, OutboundMessage, TimerId};
use chaind_messages::{YacCommitGossip, YacFutureGossip, YacRejectGossip, YacVoteGossip};
use chaind_types::signing::yac_vote_message;
use chaind_types::{
    Block, CommitMessage, FutureMessage, KeyPair, PeerId, PeerOrder, RejectMessage, Round,
    VotePower, YacHash, YacVote,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives a single validator's side of YAC: casts this node's vote when a
/// proposal is ready, folds in votes and commit/reject evidence from peers,
/// and advances the round once one of those resolves it.
pub struct YacGate {
    local_peer: PeerId,
    signing_key: KeyPair,
    peers: PeerOrder,
    round: Round,
    votes: VoteCollector,
    cache: BlockCache,
    resolved: bool,
    /// Alternative peer designated after a reject, for the node to consult
    /// as proposer of the next round. Consumed exactly once by
    /// [`YacGate::take_alternative_peer`]; normal proposer rotation resumes
    /// after that.
    alternative_peer: Option<PeerId>,
    round_timeout: Duration,
    now: Duration,
}

impl YacGate {
    /// Build a gate for a fixed peer set, starting at `start_round`.
    pub fn new(
        local_peer: PeerId,
        signing_key: KeyPair,
        peers: PeerOrder,
        start_round: Round,
        round_timeout: Duration,
    ) -> Self {
        Self {
            local_peer,
            signing_key,
            peers,
            round: start_round,
            votes: VoteCollector::new(),
            cache: BlockCache::new(),
            resolved: false,
            alternative_peer: None,
            round_timeout,
            now: Duration::ZERO,
        }
    }

    /// Set the current time.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// The round currently being voted on.
    pub fn round(&self) -> Round {
        self.round
    }

    /// The block awaiting commit for the current round, if one has been
    /// proposed.
    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    /// Consume the alternative peer designated after the last reject, if
    /// any. Returns `None` once consumed or if no reject has occurred since
    /// the last consumption.
    pub fn take_alternative_peer(&mut self) -> Option<PeerId> {
        self.alternative_peer.take()
    }

    /// Arm the round timeout for the current round. Callers invoke this
    /// once after constructing a gate or after any round change that
    /// doesn't already arm it through an event handler.
    pub fn arm_round_timer(&self) -> Action {
        Action::SetTimer {
            id: TimerId::YacRoundTimeout { round: self.round },
            duration: self.round_timeout,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════

    /// The node's proposer produced a candidate for `round`; cast this
    /// node's vote for it. A proposal for any round other than the one
    /// currently open is ignored (stale proposer, or we've already moved
    /// on).
    pub fn on_proposal_ready(&mut self, round: Round, proposal_hash: chaind_types::Hash, block: Block) -> Vec<Action> {
        if round != self.round || self.resolved {
            return Vec::new();
        }
        let block_hash = block.hash();
        self.cache.put(block);
        self.cast_vote(YacHash { round, proposal_hash, block_hash })
    }

    /// A peer broadcast a single vote.
    pub fn on_vote_received(&mut self, from: PeerId, vote: YacVote) -> Vec<Action> {
        if vote.hash.round < self.round {
            debug!(from = %from, "ignoring vote for stale round");
            return Vec::new();
        }
        if vote.hash.round > self.round {
            return vec![Action::SendTo {
                peer: from,
                message: OutboundMessage::YacFuture(YacFutureGossip::new(FutureMessage { round: self.round })),
            }];
        }
        self.record_vote(vote)
    }

    /// A peer broadcast commit evidence. Valid evidence is adopted even if
    /// our own round has fallen behind, which is how a node that missed
    /// votes still catches up to a commit.
    pub fn on_commit_received(&mut self, message: CommitMessage) -> Vec<Action> {
        let Some(hash) = message.hash() else {
            return Vec::new();
        };
        if hash.round < self.round {
            return Vec::new();
        }
        if !self.has_supermajority(message.power(|id| self.power_of(id))) {
            warn!("discarding commit message without supermajority power");
            return Vec::new();
        }

        self.round = hash.round;
        self.resolved = true;
        let mut actions = self.emit_committed_block(hash);
        self.advance_to_next_height();
        actions.push(self.arm_round_timer());
        actions
    }

    /// A peer broadcast reject evidence for a round we're still open on.
    pub fn on_reject_received(&mut self, message: RejectMessage) -> Vec<Action> {
        let Some(round) = message.votes.first().map(|v| v.hash.round) else {
            return Vec::new();
        };
        if round < self.round || self.resolved {
            return Vec::new();
        }
        self.round = round;
        self.resolved = true;
        self.advance_after_reject();
        vec![self.arm_round_timer()]
    }

    /// A peer told us it has moved on to a later round than ours. We can't
    /// resolve this locally (no supermajority evidence), so fall back to
    /// fetching the block the other side has already committed.
    pub fn on_future_received(&mut self, from: PeerId, message: FutureMessage) -> Vec<Action> {
        if message.round > self.round {
            info!(%from, round = %message.round, "peer reports a later round than ours, starting sync");
            return vec![Action::EnqueueInternal {
                event: Event::StartSync { target_height: message.round.block_height },
            }];
        }
        Vec::new()
    }

    /// The round's liveness timer fired without a commit or reject forming.
    pub fn on_round_timeout(&mut self, round: Round) -> Vec<Action> {
        if round != self.round || self.resolved {
            return Vec::new();
        }
        info!(round = %round, "round timed out without resolving, rejecting");
        let message = RejectMessage { votes: self.votes.votes().cloned().collect() };
        self.resolved = true;
        let mut actions = vec![Action::Broadcast {
            message: OutboundMessage::YacReject(YacRejectGossip::new(message)),
        }];
        self.advance_after_reject();
        actions.push(self.arm_round_timer());
        actions
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════

    fn power_of(&self, id: PeerId) -> VotePower {
        self.peers.power_of(id).unwrap_or(VotePower::MIN)
    }

    fn has_supermajority(&self, power: u64) -> bool {
        VotePower::has_supermajority(power, self.peers.total_power())
    }

    fn cast_vote(&mut self, hash: YacHash) -> Vec<Action> {
        let message = yac_vote_message(hash.round.block_height, hash.round.reject_round, &hash.proposal_hash, &hash.block_hash);
        let signature = self.signing_key.sign(&message);
        let vote = YacVote { hash, signer: self.local_peer, public_key: self.signing_key.public_key(), signature };

        let mut actions = vec![Action::Broadcast {
            message: OutboundMessage::YacVote(YacVoteGossip::new(vote.clone())),
        }];
        actions.extend(self.record_vote(vote));
        actions
    }

    fn record_vote(&mut self, vote: YacVote) -> Vec<Action> {
        if self.resolved || !self.votes.insert(vote) {
            return Vec::new();
        }
        self.evaluate()
    }

    fn evaluate(&mut self) -> Vec<Action> {
        let total_power = self.peers.total_power();
        for hash in self.votes.distinct_hashes() {
            let power = self.votes.power_for(hash, |id| self.power_of(id));
            if VotePower::has_supermajority(power, total_power) {
                self.resolved = true;
                let mut actions = self.finalize_commit(hash);
                self.advance_to_next_height();
                actions.push(self.arm_round_timer());
                return actions;
            }
        }

        if !self.peers.0.is_empty() && self.votes.voter_count() >= self.peers.0.len() {
            let distinct_proposals: std::collections::BTreeSet<_> =
                self.votes.distinct_hashes().into_iter().map(|h| h.proposal_hash).collect();
            let message = RejectMessage { votes: self.votes.votes().cloned().collect() };
            info!(
                proposals = distinct_proposals.len(),
                round = %self.round,
                "all votes in, no hash reached supermajority"
            );
            self.resolved = true;
            let mut actions = vec![Action::Broadcast {
                message: OutboundMessage::YacReject(YacRejectGossip::new(message)),
            }];
            self.advance_after_reject();
            actions.push(self.arm_round_timer());
            return actions;
        }

        Vec::new()
    }

    /// Broadcast commit evidence built from locally-collected votes, then
    /// emit the committed block if we have it cached.
    fn finalize_commit(&mut self, hash: YacHash) -> Vec<Action> {
        let votes = self.votes.votes_for(hash);
        let message = CommitMessage { votes };
        let mut actions = vec![Action::Broadcast {
            message: OutboundMessage::YacCommit(YacCommitGossip::new(message)),
        }];
        actions.extend(self.emit_committed_block(hash));
        actions
    }

    /// Emit the cached block for `hash` if we have it and it matches.
    /// Otherwise the committed round moved past a block this node never
    /// voted for (or voted for something else); fall back to fetching it
    /// from the network rather than staying stuck on an unreachable height.
    fn emit_committed_block(&mut self, hash: YacHash) -> Vec<Action> {
        if hash.is_none() {
            return Vec::new();
        }
        match self.cache.take() {
            Some(block) if block.hash() == hash.block_hash => vec![Action::EmitCommittedBlock { block }],
            _ => {
                warn!(round = %hash.round, "committed block doesn't match local cache, starting sync");
                vec![Action::EnqueueInternal {
                    event: Event::StartSync { target_height: hash.round.block_height },
                }]
            }
        }
    }

    fn advance_to_next_height(&mut self) {
        self.round = self.round.next_height();
        self.votes.reset();
        self.cache.clear();
        self.resolved = false;
        self.alternative_peer = None;
    }

    fn advance_after_reject(&mut self) {
        if self.alternative_peer.is_none() && !self.peers.0.is_empty() {
            let next_index = (self.round.reject_round as usize + 1) % self.peers.0.len();
            self.alternative_peer = self.peers.0.get(next_index).map(|p| p.id);
        }
        self.round = self.round.next_reject();
        self.votes.reset();
        self.cache.clear();
        self.resolved = false;
    }
}

/// Dispatch an [`Event`] to the right gate method; see
/// `chaind_mst::handle` for the same pattern applied to MST.
pub fn handle(gate: &mut YacGate, event: Event) -> Option<Vec<Action>> {
    match event {
        Event::ProposalReady { round, proposal_hash, block } => Some(gate.on_proposal_ready(round, proposal_hash, block)),
        Event::YacVoteReceived { from, vote } => Some(gate.on_vote_received(from, vote)),
        Event::YacCommitReceived { message, .. } => Some(gate.on_commit_received(message)),
        Event::YacRejectReceived { message, .. } => Some(gate.on_reject_received(message)),
        Event::YacFutureReceived { from, message } => Some(gate.on_future_received(from, message)),
        Event::YacRoundTimeout { round } => Some(gate.on_round_timeout(round)),
        _ => None,
    }
}
