//! Single-use permit nonces.
//!
//! A permit nonce is scoped to its owner: the same number may be used once
//! by every owner. Nonces are unordered; any unused value is accepted.

use std::collections::{HashMap, HashSet};

use stakematch_types::{Address, Result, StakematchError};

/// `owner → used nonces`.
#[derive(Debug, Clone, Default)]
pub struct PermitNonces {
    used: HashMap<Address, HashSet<u64>>,
}

impl PermitNonces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_used(&self, owner: &Address, nonce: u64) -> bool {
        self.used.get(owner).is_some_and(|set| set.contains(&nonce))
    }

    /// Fail if the nonce was already consumed.
    pub fn ensure_unused(&self, owner: &Address, nonce: u64) -> Result<()> {
        if self.is_used(owner, nonce) {
            return Err(StakematchError::PermitNonceReused {
                owner: *owner,
                nonce,
            });
        }
        Ok(())
    }

    /// Check and record a nonce.
    pub fn consume(&mut self, owner: &Address, nonce: u64) -> Result<()> {
        if !self.used.entry(*owner).or_default().insert(nonce) {
            return Err(StakematchError::PermitNonceReused {
                owner: *owner,
                nonce,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_blocked() {
        let mut nonces = PermitNonces::new();
        let owner = Address([1; 20]);
        nonces.consume(&owner, 42).unwrap();
        assert!(nonces.is_used(&owner, 42));
        let err = nonces.consume(&owner, 42).unwrap_err();
        assert!(matches!(err, StakematchError::PermitNonceReused { nonce: 42, .. }));
        assert!(nonces.ensure_unused(&owner, 42).is_err());
    }

    #[test]
    fn owners_are_independent() {
        let mut nonces = PermitNonces::new();
        nonces.consume(&Address([1; 20]), 7).unwrap();
        nonces.consume(&Address([2; 20]), 7).unwrap();
        nonces.consume(&Address([1; 20]), 3).unwrap();
        assert!(nonces.is_used(&Address([2; 20]), 7));
        assert!(!nonces.is_used(&Address([2; 20]), 3));
    }
}
