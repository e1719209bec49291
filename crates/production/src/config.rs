//! TOML-loaded node configuration: identity, peer set, and the tunables
//! each sub-state-machine exposes as a deploy-time config struct.

use chaind_mst::MstConfig;
use chaind_sync::SyncConfig;
use chaind_types::{Peer, PeerId, PeerOrder, PublicKey, VotePower};
use chaind_validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// This node's own identity within the configured peer set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeIdentityConfig {
    /// This node's peer id, matching one entry in `peers`.
    pub id: u64,
    /// Seed for this node's deterministic signing keypair.
    ///
    /// A production deployment would load a real key from a secrets store;
    /// a raw seed byte is enough for the in-process demo this runner drives.
    pub signing_key_seed: u8,
}

/// A peer entry in the configured validator set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerConfig {
    /// The peer's network identity.
    pub id: u64,
    /// The peer's consensus public key.
    pub public_key: PublicKey,
    /// Voting power held by the peer.
    pub vote_power: u64,
}

impl PeerConfig {
    /// Convert into the runtime [`Peer`] type.
    pub fn to_peer(&self) -> Peer {
        Peer {
            id: PeerId(self.id),
            public_key: self.public_key,
            vote_power: VotePower::new(self.vote_power),
        }
    }
}

/// Top-level validator configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaindConfig {
    /// This node's identity.
    pub node: NodeIdentityConfig,
    /// The full validator set, including this node.
    pub peers: Vec<PeerConfig>,
    /// MST propagation cadence and expiry grace window.
    #[serde(default)]
    pub mst: MstConfig,
    /// Block synchronizer fetch timeout and retry policy.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Inbound batch structural validation limits.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Liveness timeout for a YAC round before it is abandoned.
    #[serde(default = "default_yac_round_timeout")]
    pub yac_round_timeout: Duration,
}

fn default_yac_round_timeout() -> Duration {
    Duration::from_secs(5)
}

impl ChaindConfig {
    /// Load and parse a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured peer set as a [`PeerOrder`], in declaration order.
    pub fn peer_order(&self) -> PeerOrder {
        PeerOrder(self.peers.iter().map(PeerConfig::to_peer).collect())
    }
}

/// Errors loading a [`ChaindConfig`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    /// The config file's contents were not valid TOML, or didn't match the
    /// expected shape.
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}
