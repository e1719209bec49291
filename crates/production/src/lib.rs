//! Ambient runner glue: configuration loading, logging setup, and a local
//! in-process transport for driving the coordination state machines end to
//! end without a real network stack.
//!
//! The wire codec and peer discovery proper are out of scope here (they sit
//! behind the abstract [`PeerTransport`] collaborator); this crate exists to
//! show the state machines actually running, not to ship a network stack.

pub mod config;
pub mod logging;
pub mod transport;

pub use config::{ChaindConfig, ConfigError, NodeIdentityConfig, PeerConfig};
pub use logging::init_tracing;
pub use transport::{ChannelTransport, InboundMessage, PeerTransport};
