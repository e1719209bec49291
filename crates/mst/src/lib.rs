//! Multi-signature transaction propagation: set-algebraic state plus the
//! gossip processor that keeps peers converged on it.

mod completer;
mod presence;
mod processor;
mod state;

pub use completer::{Completer, GraceWindowCompleter};
pub use presence::{InMemoryPresenceCache, PresenceCache, TxPresence};
pub use processor::{handle, MstConfig, MstProcessor};
pub use state::{MstState, StateUpdateResult};
