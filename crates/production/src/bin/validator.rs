//! `chaind-validator`: a local multi-node demo of the coordination core.
//!
//! Boots one [`NodeStateMachine`] per peer in the configured validator set,
//! wires them together with [`ChannelTransport`]s, submits a demo batch to
//! the first peer, and drains the resulting actions for a fixed duration,
//! logging what each node does. This is a harness for watching MST
//! propagation and pending-index bookkeeping run end to end, not a
//! production network node; the wire codec and peer discovery that would
//! back a real `PeerTransport` are out of scope (see crate docs).

use chaind_core::{Action, Event, OutboundMessage, RequestId, StateMachine};
use chaind_mst::{GraceWindowCompleter, InMemoryPresenceCache, MstProcessor};
use chaind_node::NodeStateMachine;
use chaind_production::{init_tracing, ChaindConfig, ChannelTransport, InboundMessage, PeerTransport};
use chaind_production::transport::inbound_to_event;
use chaind_sync::Synchronizer;
use chaind_types::{AccountId, Batch, BatchType, KeyPair, PeerId, Round, Transaction};
use chaind_yac::YacGate;
use clap::Parser;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser)]
#[command(name = "chaind-validator")]
#[command(about = "Runs a local multi-node demo of the MST/YAC/sync coordination core")]
struct Cli {
    /// Path to a TOML config file describing the peer set and sub-machine
    /// tunables. See `ChaindConfig` for the expected shape.
    #[arg(short, long)]
    config: PathBuf,

    /// How many seconds to drive the demo's in-process network before
    /// shutting down.
    #[arg(long, default_value_t = 2)]
    run_secs: u64,
}

/// One node's share of the demo: its state machine and the inbox its
/// transport's peers deliver into.
struct NodeHandle {
    id: PeerId,
    node: NodeStateMachine,
    transport: ChannelTransport,
    inbox: mpsc::UnboundedReceiver<InboundMessage>,
}

fn build_nodes(config: &ChaindConfig) -> Vec<NodeHandle> {
    let peer_order = config.peer_order();
    let peer_ids: Vec<PeerId> = peer_order.iter().map(|p| p.id).collect();

    let mut senders = HashMap::new();
    let mut inboxes = HashMap::new();
    for id in &peer_ids {
        let (tx, rx) = mpsc::unbounded_channel();
        senders.insert(*id, tx);
        inboxes.insert(*id, rx);
    }

    peer_ids
        .iter()
        .map(|&id| {
            let others: HashMap<PeerId, mpsc::UnboundedSender<InboundMessage>> = senders
                .iter()
                .filter(|(peer, _)| **peer != id)
                .map(|(peer, tx)| (*peer, tx.clone()))
                .collect();
            let transport = ChannelTransport::new(id, others);

            // The demo derives each peer's signing key from its id rather
            // than loading a real secret; see `ChaindConfig::node` docs.
            let signing_key = KeyPair::from_seed(&[id.0 as u8; 32]);
            let completer = Box::new(GraceWindowCompleter::new(config.mst.expiry_grace));
            let mst = MstProcessor::new(
                peer_ids.iter().copied().filter(|p| *p != id).collect(),
                completer,
                Box::new(InMemoryPresenceCache::new()),
                config.mst.clone(),
            );
            let yac = YacGate::new(
                id,
                signing_key,
                peer_order.clone(),
                Round::first(chaind_types::BlockHeight::GENESIS),
                config.yac_round_timeout,
            );
            let sync = Synchronizer::new(peer_order.clone(), config.sync.clone());
            let node = NodeStateMachine::new(mst, yac, sync, config.validation.clone());

            NodeHandle { id, node, transport, inbox: inboxes.remove(&id).expect("inbox exists") }
        })
        .collect()
}

fn execute_actions(id: PeerId, node: &mut NodeStateMachine, transport: &ChannelTransport, actions: Vec<Action>) {
    let mut queue = actions;
    while let Some(action) = queue.pop() {
        match action {
            Action::SendTo { peer, message: OutboundMessage::MstState(gossip) } => {
                let success = transport.send_to(peer, OutboundMessage::MstState(gossip.clone()));
                queue.extend(node.handle(Event::MstSendResult { peer, batches: gossip.batches, success }));
            }
            Action::SendTo { peer, message } => {
                transport.send_to(peer, message);
            }
            Action::Broadcast { message } => transport.broadcast(message),
            Action::SetTimer { id: timer_id, duration } => {
                tracing::debug!(node = %id, ?timer_id, ?duration, "timer armed (demo runner does not fire timers)");
            }
            Action::CancelTimer { id: timer_id } => {
                tracing::debug!(node = %id, ?timer_id, "timer cancelled");
            }
            Action::EnqueueInternal { event } => queue.extend(node.handle(event)),
            Action::EmitBatchAccepted { request_id, reduced_hash } => {
                info!(node = %id, %request_id, %reduced_hash, "batch accepted into MST state");
            }
            Action::EmitBatchCompleted { batch } => {
                info!(node = %id, reduced_hash = %batch.reduced_hash(), "batch reached signature quorum");
            }
            Action::EmitBatchExpired { batch } => {
                info!(node = %id, reduced_hash = %batch.reduced_hash(), "batch expired before quorum");
            }
            Action::EmitBatchFinalized { batch } => {
                info!(node = %id, reduced_hash = %batch.reduced_hash(), "batch dropped: finalized elsewhere");
            }
            Action::EmitCommittedBlock { block } => {
                info!(node = %id, height = %block.header.height, "block committed");
            }
        }
    }
}

/// A one-transaction demo batch requiring every configured peer's signature,
/// so MST gossip has visible work to do.
fn demo_batch(quorum: u8) -> Batch {
    Batch {
        transactions: vec![Transaction {
            creator: AccountId::new("demo@chaind").expect("valid demo account id"),
            payload: b"demo-transfer".to_vec(),
            created_at: 0,
            quorum,
            signatures: BTreeMap::new(),
        }],
        batch_type: BatchType::Atomic,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = ChaindConfig::load(&cli.config)?;

    let mut nodes = build_nodes(&config);
    info!(peers = nodes.len(), "demo network booted");

    let quorum = nodes.len().max(1) as u8;
    let batch = demo_batch(quorum);
    if let Some(first) = nodes.first_mut() {
        let actions = first.node.handle(Event::SubmitBatch { batch, request_id: RequestId::new(1) });
        execute_actions(first.id, &mut first.node, &first.transport, actions);
    }

    // `Action::SetTimer` is logged rather than armed (this runner has no
    // timer wheel); the MST gossip cadence is instead driven directly here
    // so the demo actually shows batches propagating between nodes.
    let mut gossip_tick = tokio::time::interval(config.mst.propagation_period);
    let deadline = tokio::time::Instant::now() + Duration::from_secs(cli.run_secs);
    loop {
        if tokio::time::Instant::now() >= deadline {
            break;
        }
        let mut delivered = false;
        for handle in &mut nodes {
            while let Ok(msg) = handle.inbox.try_recv() {
                delivered = true;
                if let Some(event) = inbound_to_event(msg) {
                    let actions = handle.node.handle(event);
                    execute_actions(handle.id, &mut handle.node, &handle.transport, actions);
                }
            }
        }
        if !delivered {
            tokio::select! {
                _ = gossip_tick.tick() => {
                    for handle in &mut nodes {
                        let actions = handle.node.handle(Event::MstGossipTimer);
                        execute_actions(handle.id, &mut handle.node, &handle.transport, actions);
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(20)) => {}
            }
        }
    }

    info!("demo run complete");
    Ok(())
}
