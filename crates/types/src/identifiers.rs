//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Peer identifier (a validator's node identity in the network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Genesis block height.
    pub const GENESIS: Self = BlockHeight(1);

    /// Get the next block height.
    pub fn next(self) -> Self {
        BlockHeight(self.0 + 1)
    }

    /// Get the previous block height (returns `None` at genesis).
    pub fn prev(self) -> Option<Self> {
        if self.0 > Self::GENESIS.0 {
            Some(BlockHeight(self.0 - 1))
        } else {
            None
        }
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height({})", self.0)
    }
}

/// Voting power (stake weight) held by a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VotePower(pub u64);

impl VotePower {
    /// Minimum vote power.
    pub const MIN: Self = VotePower(1);

    /// Create from a raw value, ensuring it's at least 1.
    pub fn new(power: u64) -> Self {
        VotePower(power.max(1))
    }

    /// Get the raw value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Sum voting power across a list of peers.
    pub fn sum(powers: &[VotePower]) -> u64 {
        powers.iter().map(|p| p.0).sum()
    }

    /// Check whether `voted` reaches BFT supermajority (> 2/3) of `total`.
    pub fn has_supermajority(voted: u64, total: u64) -> bool {
        voted * 3 > total * 2
    }
}

impl fmt::Display for VotePower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a domain account, of the form `account_name@domain_id`.
///
/// Both components must be non-empty and must not themselves contain `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Parse and validate an account identifier.
    pub fn new(raw: impl Into<String>) -> Result<Self, AccountIdError> {
        let raw = raw.into();
        let mut parts = raw.splitn(2, '@');
        let name = parts.next().unwrap_or("");
        let domain = match parts.next() {
            Some(domain) => domain,
            None => return Err(AccountIdError::MissingDomain(raw)),
        };
        if name.is_empty() || domain.is_empty() {
            return Err(AccountIdError::EmptyComponent(raw));
        }
        if domain.contains('@') {
            return Err(AccountIdError::ExtraAt(raw));
        }
        Ok(Self(raw))
    }

    /// The account name component (before `@`).
    pub fn name(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// The domain component (after `@`).
    pub fn domain(&self) -> &str {
        self.0.splitn(2, '@').nth(1).unwrap_or("")
    }

    /// The full `name@domain` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors parsing an [`AccountId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    /// No `@domain` suffix was present.
    #[error("account id '{0}' is missing a @domain suffix")]
    MissingDomain(String),
    /// The name or domain component was empty.
    #[error("account id '{0}' has an empty name or domain component")]
    EmptyComponent(String),
    /// More than one `@` was present.
    #[error("account id '{0}' contains more than one @")]
    ExtraAt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_height_next_prev() {
        let height = BlockHeight(10);
        assert_eq!(height.next(), BlockHeight(11));
        assert_eq!(height.prev(), Some(BlockHeight(9)));
        assert_eq!(BlockHeight::GENESIS.prev(), None);
    }

    #[test]
    fn test_vote_power_supermajority() {
        let total = 4;
        assert!(!VotePower::has_supermajority(2, total));
        assert!(VotePower::has_supermajority(3, total));
        assert!(VotePower::has_supermajority(4, total));
    }

    #[test]
    fn test_account_id_parses_name_and_domain() {
        let account = AccountId::new("alice@wonderland").unwrap();
        assert_eq!(account.name(), "alice");
        assert_eq!(account.domain(), "wonderland");
    }

    #[test]
    fn test_account_id_rejects_missing_domain() {
        assert!(matches!(
            AccountId::new("alice"),
            Err(AccountIdError::MissingDomain(_))
        ));
    }

    #[test]
    fn test_account_id_rejects_empty_component() {
        assert!(matches!(
            AccountId::new("@wonderland"),
            Err(AccountIdError::EmptyComponent(_))
        ));
        assert!(matches!(
            AccountId::new("alice@"),
            Err(AccountIdError::EmptyComponent(_))
        ));
    }
}
