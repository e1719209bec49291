//! YAC votes and the commit/reject/future messages built from them.

use crate::{PeerId, PublicKey, Round, Signature, VotePower, YacHash};
use serde::{Deserialize, Serialize};

/// A single signed vote for a [`YacHash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YacVote {
    /// What is being voted for.
    pub hash: YacHash,
    /// Who cast the vote.
    pub signer: PeerId,
    /// The signer's consensus public key (redundant with `signer` but kept
    /// so a vote is self-verifying without a peer table lookup).
    pub public_key: PublicKey,
    /// Signature over [`chaind_types::signing::yac_vote_message`] for `hash`.
    pub signature: Signature,
}

/// Evidence that a supermajority voted for the same non-empty [`YacHash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    /// The supermajority's votes, all for the same hash.
    pub votes: Vec<YacVote>,
}

impl CommitMessage {
    /// The agreed-upon hash, taken from the first vote.
    ///
    /// Callers must validate `votes` is non-empty and uniform before
    /// constructing a `CommitMessage`.
    pub fn hash(&self) -> Option<YacHash> {
        self.votes.first().map(|v| v.hash.clone())
    }

    /// Sum of voting power behind this commit.
    pub fn power(&self, power_of: impl Fn(PeerId) -> VotePower) -> u64 {
        self.votes.iter().map(|v| power_of(v.signer).get()).sum()
    }
}

/// Evidence that the round failed to reach commit supermajority: either a
/// supermajority explicitly voted for nothing, or votes split across
/// multiple distinct hashes such that no hash can still reach
/// supermajority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectMessage {
    /// All votes observed for the round being rejected.
    pub votes: Vec<YacVote>,
}

/// Evidence that the sender has already moved on to a later round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FutureMessage {
    /// The round the sender is currently in.
    pub round: Round,
}
