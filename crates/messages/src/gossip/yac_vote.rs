//! YAC consensus gossip: votes and the commit/reject/future messages built
//! from them.

use chaind_types::{CommitMessage, FutureMessage, RejectMessage, YacVote};
use serde::{Deserialize, Serialize};

/// A single vote broadcast to the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YacVoteGossip {
    /// The vote being broadcast.
    pub vote: YacVote,
}

impl YacVoteGossip {
    /// Wrap a vote for broadcast.
    pub fn new(vote: YacVote) -> Self {
        Self { vote }
    }
}

/// Broadcast of a commit supermajority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YacCommitGossip {
    /// The commit evidence.
    pub message: CommitMessage,
}

impl YacCommitGossip {
    /// Wrap commit evidence for broadcast.
    pub fn new(message: CommitMessage) -> Self {
        Self { message }
    }
}

/// Broadcast of a reject supermajority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YacRejectGossip {
    /// The reject evidence.
    pub message: RejectMessage,
}

impl YacRejectGossip {
    /// Wrap reject evidence for broadcast.
    pub fn new(message: RejectMessage) -> Self {
        Self { message }
    }
}

/// Broadcast informing a peer that the sender has moved to a later round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YacFutureGossip {
    /// The future-round evidence.
    pub message: FutureMessage,
}

impl YacFutureGossip {
    /// Wrap future-round evidence for broadcast.
    pub fn new(message: FutureMessage) -> Self {
        Self { message }
    }
}
