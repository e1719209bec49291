//! Composition of the MST processor, the YAC gate, the block synchronizer,
//! and the pending-transaction index into one node.

use chaind_core::{Action, Event, RequestId, StateMachine};
use chaind_messages::MstStateGossip;
use chaind_mst::MstProcessor;
use chaind_pending::{Page, PendingQueryError, PendingTxIndex};
use chaind_sync::Synchronizer;
use chaind_types::{AccountId, Batch, Hash, PeerId};
use chaind_validation::{validate_batch, BatchValidationError, IncomingBatch, ValidationConfig};
use chaind_yac::YacGate;
use std::time::Duration;

/// A complete node: one each of the MST processor, YAC gate, synchronizer,
/// and pending-tx index, wired together.
///
/// Most events are routed to exactly one sub-machine via the `handle` free
/// function each of `chaind-mst`, `chaind-yac`, and `chaind-sync` exposes.
/// A handful of events also have side effects that cross sub-machine
/// boundaries and are handled here directly:
/// - `SubmitBatch` / `MstStateReceived` / `TransactionFinalized` keep the
///   pending-tx index in step with MST state.
/// - A YAC commit is handed to the synchronizer's prepared-commit fast
///   path, so it doesn't redundantly fetch a block it already has.
pub struct NodeStateMachine {
    mst: MstProcessor,
    yac: YacGate,
    sync: Synchronizer,
    pending: PendingTxIndex,
    validation: ValidationConfig,
    now: Duration,
}

impl NodeStateMachine {
    /// Compose a node from its four sub-machines and a validation config.
    pub fn new(
        mst: MstProcessor,
        yac: YacGate,
        sync: Synchronizer,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            mst,
            yac,
            sync,
            pending: PendingTxIndex::new(),
            validation,
            now: Duration::ZERO,
        }
    }

    /// The MST processor's current local state, for feeding proposal
    /// formation (out of scope here; the node just exposes it).
    pub fn mst(&self) -> &MstProcessor {
        &self.mst
    }

    /// The YAC gate's current round, for external proposer-selection logic.
    pub fn yac(&self) -> &YacGate {
        &self.yac
    }

    /// Whether the synchronizer currently has a fetch in flight.
    pub fn is_syncing(&self) -> bool {
        self.sync.is_syncing()
    }

    /// Structurally validate a batch before it is submitted. Not an
    /// `Event`/`Action`: this is a synchronous, stateless check an ingress
    /// layer runs ahead of `handle(Event::SubmitBatch { .. })`, not a state
    /// transition of any sub-machine.
    pub fn validate_batch(&self, batch: &IncomingBatch) -> Result<(), BatchValidationError> {
        validate_batch(&self.validation, batch)
    }

    /// Page through an account's pending transactions. Not an
    /// `Event`/`Action`: a synchronous read against the pending-tx index,
    /// not a state transition.
    pub fn pending_page(
        &self,
        account: &AccountId,
        cursor: Option<Hash>,
        page_size: usize,
    ) -> Result<Page, PendingQueryError> {
        self.pending.page_for_account(account, cursor, page_size)
    }

    fn on_submit_batch(&mut self, batch: Batch, request_id: RequestId) -> Vec<Action> {
        let reduced_hash = batch.reduced_hash();
        let actions = self.mst.on_submit_batch(batch, request_id);
        self.sync_pending_after_touch(&[reduced_hash], &actions);
        actions
    }

    fn on_mst_state_received(&mut self, from: PeerId, gossip: MstStateGossip) -> Vec<Action> {
        let touched: Vec<Hash> = gossip.batches.iter().map(Batch::reduced_hash).collect();
        let actions = self.mst.on_state_received(from, gossip);
        self.sync_pending_after_touch(&touched, &actions);
        actions
    }

    fn on_transaction_finalized(&mut self, reduced_hash: Hash) -> Vec<Action> {
        let actions = self.mst.on_transaction_finalized(reduced_hash);
        self.apply_pending_removals(&actions);
        actions
    }

    /// After an MST-touching event, the batches it touched either still sit
    /// in MST state (accepted, not yet complete: belongs in pending) or
    /// were just removed by `drain_completions`/expiry (already surfaced
    /// via an `Emit*` action, handled by `apply_pending_removals`).
    fn sync_pending_after_touch(&mut self, touched: &[Hash], actions: &[Action]) {
        self.apply_pending_removals(actions);
        for hash in touched {
            if let Some(batch) = self.mst.own_state().get(*hash) {
                self.pending.insert_batch(batch.clone());
            }
        }
    }

    fn apply_pending_removals(&mut self, actions: &[Action]) {
        for action in actions {
            let batch = match action {
                Action::EmitBatchCompleted { batch } => batch,
                Action::EmitBatchExpired { batch } => batch,
                Action::EmitBatchFinalized { batch } => batch,
                _ => continue,
            };
            self.pending.remove_batch(batch.reduced_hash());
        }
    }

    /// A block the YAC gate just committed locally should short-circuit
    /// any in-flight synchronizer fetch for the same height.
    fn feed_locally_committed(&mut self, actions: &mut Vec<Action>) {
        let committed_blocks: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                Action::EmitCommittedBlock { block } => Some(block.clone()),
                _ => None,
            })
            .collect();
        for block in &committed_blocks {
            actions.extend(self.sync.on_locally_committed(block));
        }
    }

    fn dispatch_consensus(&mut self, event: Event) -> Vec<Action> {
        chaind_mst::handle(&mut self.mst, event.clone())
            .or_else(|| chaind_yac::handle(&mut self.yac, event.clone()))
            .or_else(|| chaind_sync::handle(&mut self.sync, event))
            .unwrap_or_default()
    }
}

impl StateMachine for NodeStateMachine {
    fn handle(&mut self, event: Event) -> Vec<Action> {
        let mut actions = match event {
            Event::SubmitBatch { batch, request_id } => self.on_submit_batch(batch, request_id),
            Event::MstStateReceived { from, gossip } => self.on_mst_state_received(from, gossip),
            Event::TransactionFinalized { reduced_hash } => {
                self.on_transaction_finalized(reduced_hash)
            }
            other => self.dispatch_consensus(other),
        };
        self.feed_locally_committed(&mut actions);
        actions
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
        self.mst.set_time(now);
        self.yac.set_time(now);
        self.sync.set_time(now);
    }

    fn now(&self) -> Duration {
        self.now
    }
}
