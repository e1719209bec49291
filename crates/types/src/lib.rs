//! Core data types shared across the multi-sig transaction propagation,
//! pending-transaction index, YAC consensus gate, and block synchronizer
//! crates.

mod batch;
mod block;
mod consensus;
mod crypto;
mod hash;
mod identifiers;
mod peer;
pub mod signing;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
mod vote;

pub use batch::{Batch, BatchMeta, BatchType, Transaction};
pub use block::{Block, BlockHeader};
pub use consensus::{Round, YacHash};
pub use crypto::{KeyPair, PublicKey, Signature};
pub use hash::{Hash, HexError};
pub use identifiers::{AccountId, AccountIdError, BlockHeight, PeerId, VotePower};
pub use peer::{Peer, PeerOrder};
pub use vote::{CommitMessage, FutureMessage, RejectMessage, YacVote};
