//! Block synchronization: a chunked fetch loop with partial-failure
//! peer-switching recovery.

mod config;
mod synchronizer;

pub use config::SyncConfig;
pub use synchronizer::{handle, Synchronizer};
