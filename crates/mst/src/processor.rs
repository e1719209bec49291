//! The MST gossip processor: owns local state, per-peer view tracking, and
//! the periodic propagation loop.

use crate::completer::Completer;
use crate::presence::{PresenceCache, TxPresence};
use crate::state::MstState;
use chaind_core::{Action, Event, OutboundMessage, RequestId, TimerId};
use chaind_messages::MstStateGossip;
use chaind_types::{Batch, Hash, PeerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the MST processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MstConfig {
    /// How often the gossip timer fires and a peer is chosen for
    /// propagation.
    pub propagation_period: Duration,
    /// How long an unsigned batch is kept before being dropped.
    pub expiry_grace: Duration,
}

impl Default for MstConfig {
    fn default() -> Self {
        Self {
            propagation_period: Duration::from_millis(500),
            expiry_grace: Duration::from_secs(3600),
        }
    }
}

/// Drives multi-sig transaction propagation: accepts locally submitted
/// batches, merges peer pushes into local state, and periodically gossips
/// the diff against each peer's last-known view.
pub struct MstProcessor {
    own_state: MstState,
    peer_view: HashMap<PeerId, MstState>,
    peer_order: Vec<PeerId>,
    next_peer_index: usize,
    completer: Box<dyn Completer>,
    presence: Box<dyn PresenceCache>,
    config: MstConfig,
    now: Duration,
}

impl MstProcessor {
    /// Create a processor for a fixed peer set.
    pub fn new(
        peers: Vec<PeerId>,
        completer: Box<dyn Completer>,
        presence: Box<dyn PresenceCache>,
        config: MstConfig,
    ) -> Self {
        Self {
            own_state: MstState::new(),
            peer_view: peers.iter().map(|p| (*p, MstState::new())).collect(),
            peer_order: peers,
            next_peer_index: 0,
            completer,
            presence,
            config,
            now: Duration::ZERO,
        }
    }

    /// Set the current time.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// The current local MST state, for inspection by the node (e.g. to
    /// feed the block proposer).
    pub fn own_state(&self) -> &MstState {
        &self.own_state
    }

    // ═══════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════

    /// A client submitted a batch (possibly already partially signed).
    pub fn on_submit_batch(&mut self, batch: Batch, request_id: RequestId) -> Vec<Action> {
        let reduced_hash = batch.reduced_hash();
        let result = self.own_state.merge_batch(batch);
        let mut actions = vec![Action::EmitBatchAccepted { request_id, reduced_hash }];
        self.drain_completions(result, &mut actions);
        actions
    }

    /// A peer pushed its view of the MST state diff.
    ///
    /// Batches containing a transaction already resolved on-chain (per the
    /// presence cache) are dropped whole rather than merged, so a peer
    /// replaying stale gossip for a committed or rejected transaction can't
    /// bring it back into state.
    pub fn on_state_received(&mut self, from: PeerId, gossip: MstStateGossip) -> Vec<Action> {
        let mut actions = Vec::new();

        for batch in gossip.batches {
            let already_resolved = batch
                .transactions
                .iter()
                .any(|tx| !matches!(self.presence.status(tx.reduced_hash()), TxPresence::Missing));
            if already_resolved {
                debug!(reduced_hash = %batch.reduced_hash(), "dropping already-resolved batch from inbound MST gossip");
                continue;
            }

            let result = self.own_state.merge_batch(batch.clone());
            self.peer_view.entry(from).or_default().merge_batch(batch);
            self.drain_completions(result, &mut actions);
        }

        actions
    }

    /// A transaction was finalized through another path; drop any MST
    /// batch still tracking it and mark it resolved so replayed gossip for
    /// it is rejected.
    pub fn on_transaction_finalized(&mut self, reduced_hash: Hash) -> Vec<Action> {
        self.presence.mark_resolved(reduced_hash, TxPresence::Committed);
        let dropped = self.own_state.erase_transaction(reduced_hash);
        for peer_state in self.peer_view.values_mut() {
            peer_state.erase_transaction(reduced_hash);
        }
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "dropped finalized batches from MST state");
        }
        dropped.into_iter().map(|batch| Action::EmitBatchFinalized { batch }).collect()
    }

    /// The periodic gossip timer fired: push the diff against the next
    /// peer in rotation, expire stale batches, and rearm the timer.
    ///
    /// `peer_view[p]` is NOT updated here. Whether the peer actually
    /// received the diff is only known once the runner's `send_state` call
    /// resolves, which comes back as [`Event::MstSendResult`]; updating
    /// eagerly would mark the peer caught up even if the send failed,
    /// silently losing the diff.
    pub fn on_gossip_timer(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();

        let expired = self.own_state.take_expired(self.now, self.completer.as_ref());
        if !expired.is_empty() {
            info!(count = expired.len(), "expired unsigned MST batches");
        }
        for batch in expired {
            let reduced_hash = batch.reduced_hash();
            for peer_state in self.peer_view.values_mut() {
                peer_state.remove_batch(reduced_hash);
            }
            actions.push(Action::EmitBatchExpired { batch });
        }

        if let Some(peer) = self.next_peer() {
            let peer_state = self.peer_view.entry(peer).or_default();
            let diff = self.own_state.difference(peer_state);
            if !diff.is_empty() {
                let batches: Vec<Batch> = diff.batches().cloned().collect();
                debug!(%peer, count = batches.len(), "propagating MST diff");
                actions.push(Action::SendTo {
                    peer,
                    message: OutboundMessage::MstState(MstStateGossip::new(batches)),
                });
            }
        } else {
            warn!("MST gossip timer fired with no known peers");
        }

        actions.push(Action::SetTimer {
            id: TimerId::MstGossip,
            duration: self.config.propagation_period,
        });
        actions
    }

    /// A previously dispatched MST send resolved. On success, record that
    /// the peer now has what was sent so the next tick's diff excludes it;
    /// on failure, leave `peer_view` unchanged so the next tick retries the
    /// same diff.
    pub fn on_send_result(&mut self, peer: PeerId, batches: Vec<Batch>, success: bool) -> Vec<Action> {
        if success {
            let peer_state = self.peer_view.entry(peer).or_default();
            for batch in batches {
                peer_state.merge_batch(batch);
            }
        } else {
            debug!(%peer, "MST send failed, diff will be retried next tick");
        }
        Vec::new()
    }

    fn next_peer(&mut self) -> Option<PeerId> {
        if self.peer_order.is_empty() {
            return None;
        }
        let peer = self.peer_order[self.next_peer_index % self.peer_order.len()];
        self.next_peer_index = (self.next_peer_index + 1) % self.peer_order.len();
        Some(peer)
    }

    fn drain_completions(&mut self, result: crate::state::StateUpdateResult, actions: &mut Vec<Action>) {
        for batch in result.completed {
            self.own_state.remove_batch(batch.reduced_hash());
            for peer_state in self.peer_view.values_mut() {
                peer_state.remove_batch(batch.reduced_hash());
            }
            actions.push(Action::EmitBatchCompleted { batch });
        }
    }
}

/// Dispatch an [`Event`] to the right processor method. Kept as a free
/// function (rather than `impl StateMachine for MstProcessor`) since the
/// composed node owns several processors behind one `Event` enum; see
/// `chaind-node`.
pub fn handle(processor: &mut MstProcessor, event: Event) -> Option<Vec<Action>> {
    match event {
        Event::MstGossipTimer => Some(processor.on_gossip_timer()),
        Event::MstStateReceived { from, gossip } => Some(processor.on_state_received(from, gossip)),
        Event::SubmitBatch { batch, request_id } => Some(processor.on_submit_batch(batch, request_id)),
        Event::TransactionFinalized { reduced_hash } => Some(processor.on_transaction_finalized(reduced_hash)),
        Event::MstSendResult { peer, batches, success } => Some(processor.on_send_result(peer, batches, success)),
        _ => None,
    }
}
