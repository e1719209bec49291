//! YAC consensus: the voting gate that drives a round to commit or reject,
//! plus the single-slot cache that holds a proposed block while votes are
//! exchanged over just its hash.

mod block_cache;
mod gate;
mod vote_collector;

pub use block_cache::BlockCache;
pub use gate::{handle, YacGate};
pub use vote_collector::VoteCollector;
