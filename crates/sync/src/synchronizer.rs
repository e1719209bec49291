//! Chunked block synchronizer with partial-failure peer-switching recovery.

use crate::config::SyncConfig;
use chaind_core::{Action, Event, OutboundMessage, RequestId, TimerId};
use chaind_messages::{GetBlockRequest, GetBlockResponse};
use chaind_types::{Block, BlockHeight, PeerId, PeerOrder};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
enum SyncState {
    Idle,
    Fetching {
        target_height: BlockHeight,
        next_height: BlockHeight,
        peer_index: usize,
        retries_on_current_peer: usize,
        pending_request: RequestId,
    },
}

/// Fetches blocks from peers, one height at a time, to catch a node up to
/// `target_height`.
///
/// Two kinds of peer failure are handled differently: a peer that returns a
/// block for the wrong height (a bad block in the middle of the stream) is
/// switched away from immediately, carrying forward whatever progress has
/// already been made; a peer that is merely slow or returns nothing (a
/// truncated stream) is retried once before switching.
pub struct Synchronizer {
    peers: PeerOrder,
    state: SyncState,
    config: SyncConfig,
    next_request_id: u64,
    now: Duration,
}

impl Synchronizer {
    /// Build a synchronizer over a fixed peer set.
    pub fn new(peers: PeerOrder, config: SyncConfig) -> Self {
        Self { peers, state: SyncState::Idle, config, next_request_id: 0, now: Duration::ZERO }
    }

    /// Set the current time.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// Whether the synchronizer is actively fetching.
    pub fn is_syncing(&self) -> bool {
        matches!(self.state, SyncState::Fetching { .. })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════

    /// Begin fetching blocks from `from_height` up to and including
    /// `target_height`.
    pub fn on_start_sync(&mut self, from_height: BlockHeight, target_height: BlockHeight) -> Vec<Action> {
        if from_height.0 > target_height.0 || self.peers.0.is_empty() {
            return Vec::new();
        }
        info!(%from_height, %target_height, "starting block sync");
        self.begin_fetch(target_height, from_height, 0, 0)
    }

    /// A block reached us through some other path (our own YAC gate just
    /// committed it). If it's the height we were about to fetch over the
    /// network, skip the round trip and advance directly.
    pub fn on_locally_committed(&mut self, block: &Block) -> Vec<Action> {
        let SyncState::Fetching { target_height, next_height, peer_index, .. } = self.state else {
            return Vec::new();
        };
        if block.header.height != next_height {
            return Vec::new();
        }
        debug!(height = %next_height, "sync caught up on a locally-committed block, skipping fetch");
        let mut actions = vec![Action::CancelTimer {
            id: TimerId::SyncFetchTimeout { peer: self.peer_id_at(peer_index), height: next_height },
        }];
        actions.extend(self.advance_past(target_height, next_height, peer_index));
        actions
    }

    /// A peer responded to a block fetch request.
    pub fn on_block_response(&mut self, from: PeerId, request_id: RequestId, response: GetBlockResponse) -> Vec<Action> {
        let SyncState::Fetching { target_height, next_height, peer_index, retries_on_current_peer, pending_request } =
            self.state
        else {
            return Vec::new();
        };
        if pending_request != request_id || from != self.peer_id_at(peer_index) {
            return Vec::new();
        }

        let mut actions = vec![Action::CancelTimer {
            id: TimerId::SyncFetchTimeout { peer: from, height: next_height },
        }];

        match response.block {
            Some(block) if block.header.height == next_height => {
                actions.push(Action::EmitCommittedBlock { block });
                actions.extend(self.advance_past(target_height, next_height, peer_index));
            }
            Some(_) => {
                warn!(%from, expected = %next_height, "peer returned a block for the wrong height, switching peer");
                actions.extend(self.switch_peer(target_height, next_height, peer_index));
            }
            None => {
                actions.extend(self.retry_or_switch(target_height, next_height, peer_index, retries_on_current_peer));
            }
        }
        actions
    }

    /// A fetch request timed out without a response.
    pub fn on_fetch_timeout(&mut self, from: PeerId, height: BlockHeight) -> Vec<Action> {
        let SyncState::Fetching { target_height, next_height, peer_index, retries_on_current_peer, .. } = self.state
        else {
            return Vec::new();
        };
        if height != next_height || from != self.peer_id_at(peer_index) {
            return Vec::new();
        }
        warn!(%from, %height, "block fetch timed out");
        self.retry_or_switch(target_height, next_height, peer_index, retries_on_current_peer)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════

    fn peer_id_at(&self, index: usize) -> PeerId {
        self.peers.0[index % self.peers.0.len()].id
    }

    fn next_request_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }

    fn begin_fetch(&mut self, target_height: BlockHeight, next_height: BlockHeight, peer_index: usize, retries: usize) -> Vec<Action> {
        let request_id = self.next_request_id();
        let peer = self.peer_id_at(peer_index);
        self.state = SyncState::Fetching {
            target_height,
            next_height,
            peer_index,
            retries_on_current_peer: retries,
            pending_request: request_id,
        };
        vec![
            Action::SendTo { peer, message: OutboundMessage::GetBlock(GetBlockRequest::new(next_height)) },
            Action::SetTimer {
                id: TimerId::SyncFetchTimeout { peer, height: next_height },
                duration: self.config.fetch_timeout,
            },
        ]
    }

    /// Move past `completed_height` (just obtained, from the network or
    /// locally) and either fetch the next height from the same peer or
    /// finish.
    fn advance_past(&mut self, target_height: BlockHeight, completed_height: BlockHeight, peer_index: usize) -> Vec<Action> {
        let next_height = completed_height.next();
        if next_height.0 > target_height.0 {
            info!(%target_height, "sync reached target height");
            self.state = SyncState::Idle;
            return Vec::new();
        }
        self.begin_fetch(target_height, next_height, peer_index, 0)
    }

    fn switch_peer(&mut self, target_height: BlockHeight, next_height: BlockHeight, peer_index: usize) -> Vec<Action> {
        let next_peer_index = (peer_index + 1) % self.peers.0.len();
        self.begin_fetch(target_height, next_height, next_peer_index, 0)
    }

    fn retry_or_switch(
        &mut self,
        target_height: BlockHeight,
        next_height: BlockHeight,
        peer_index: usize,
        retries_on_current_peer: usize,
    ) -> Vec<Action> {
        if retries_on_current_peer < self.config.retries_before_switch {
            self.begin_fetch(target_height, next_height, peer_index, retries_on_current_peer + 1)
        } else {
            self.switch_peer(target_height, next_height, peer_index)
        }
    }
}

/// Dispatch an [`Event`] to the right synchronizer method; see
/// `chaind_mst::handle` for the same pattern applied to MST.
pub fn handle(sync: &mut Synchronizer, event: Event) -> Option<Vec<Action>> {
    match event {
        Event::StartSync { target_height } => {
            let from = match &sync.state {
                SyncState::Fetching { next_height, .. } => *next_height,
                SyncState::Idle => BlockHeight::GENESIS,
            };
            Some(sync.on_start_sync(from, target_height))
        }
        Event::BlockResponseReceived { from, request_id, response } => Some(sync.on_block_response(from, request_id, response)),
        Event::BlockFetchTimedOut { from, height } => Some(sync.on_fetch_timeout(from, height)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaind_types::{BlockHeader, Hash, KeyPair, Peer, Round, VotePower};
    use std::collections::BTreeMap;

    fn peers(count: u64) -> PeerOrder {
        PeerOrder(
            (0..count)
                .map(|i| Peer {
                    id: PeerId(i),
                    public_key: KeyPair::from_seed(&[i as u8 + 1; 32]).public_key(),
                    vote_power: VotePower::new(1),
                })
                .collect(),
        )
    }

    fn block_at(height: u64) -> Block {
        Block {
            header: BlockHeader {
                height: BlockHeight(height),
                prev_hash: Hash::ZERO,
                batches_hash: Hash::ZERO,
                round: Round::first(BlockHeight(height)),
                created_at: 0,
            },
            batches: Vec::new(),
            commit_signatures: BTreeMap::new(),
        }
    }

    #[test]
    fn test_start_sync_requests_from_first_peer() {
        let mut sync = Synchronizer::new(peers(3), SyncConfig::default());
        let actions = sync.on_start_sync(BlockHeight(1), BlockHeight(3));
        assert!(actions.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(0), .. })));
    }

    #[test]
    fn test_valid_block_advances_to_next_height_same_peer() {
        let mut sync = Synchronizer::new(peers(3), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(3));

        let actions = sync.on_block_response(PeerId(0), RequestId::new(0), GetBlockResponse::found(block_at(1)));
        assert!(actions.iter().any(|a| matches!(a, Action::EmitCommittedBlock { .. })));
        assert!(actions.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(0), message: OutboundMessage::GetBlock(r) } if r.height == BlockHeight(2))));
    }

    #[test]
    fn test_wrong_height_block_switches_peer_immediately() {
        let mut sync = Synchronizer::new(peers(3), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(3));

        let actions = sync.on_block_response(PeerId(0), RequestId::new(0), GetBlockResponse::found(block_at(5)));
        assert!(actions.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(1), .. })));
        assert!(!actions.iter().any(|a| matches!(a, Action::EmitCommittedBlock { .. })));
    }

    #[test]
    fn test_not_found_retries_same_peer_once_then_switches() {
        let mut sync = Synchronizer::new(peers(3), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(3));

        let first_retry = sync.on_block_response(PeerId(0), RequestId::new(0), GetBlockResponse::not_found());
        assert!(first_retry.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(0), .. })));

        let second_failure = sync.on_block_response(PeerId(0), RequestId::new(1), GetBlockResponse::not_found());
        assert!(second_failure.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(1), .. })));
    }

    #[test]
    fn test_timeout_retries_then_switches() {
        let mut sync = Synchronizer::new(peers(2), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(2));

        let first = sync.on_fetch_timeout(PeerId(0), BlockHeight(1));
        assert!(first.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(0), .. })));

        let second = sync.on_fetch_timeout(PeerId(0), BlockHeight(1));
        assert!(second.iter().any(|a| matches!(a, Action::SendTo { peer: PeerId(1), .. })));
    }

    #[test]
    fn test_locally_committed_block_skips_network_fetch() {
        let mut sync = Synchronizer::new(peers(2), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(2));

        let actions = sync.on_locally_committed(&block_at(1));
        assert!(actions.iter().any(|a| matches!(a, Action::SendTo { message: OutboundMessage::GetBlock(r), .. } if r.height == BlockHeight(2))));
    }

    #[test]
    fn test_reaching_target_height_goes_idle() {
        let mut sync = Synchronizer::new(peers(1), SyncConfig::default());
        sync.on_start_sync(BlockHeight(1), BlockHeight(1));
        sync.on_block_response(PeerId(0), RequestId::new(0), GetBlockResponse::found(block_at(1)));
        assert!(!sync.is_syncing());
    }
}
