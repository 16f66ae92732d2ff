//! Engine configuration.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, Result, StakematchError, amount, constants};

/// Where the unclaimed part of a pot goes after a royale settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Credit the remainder to the game's resolver (fee capture).
    #[default]
    ToResolver,
    /// Credit the remainder to the burn address.
    Burn,
    /// Split the remainder evenly among members that did not win; dust and
    /// the no-loser case go to the resolver.
    ReturnToLosers,
}

/// Configuration for a single engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own custody account. Deposits land here; payouts leave
    /// from here.
    pub custody_account: Address,
    /// Fee taken from a decisive duel result.
    #[serde(default)]
    pub duel_fee: Decimal,
    /// Routing of unclaimed pot balances.
    #[serde(default)]
    pub remainder_policy: RemainderPolicy,
    /// Upper bound on game capacity.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u32,
}

fn default_max_capacity() -> u32 {
    constants::MAX_CAPACITY
}

impl EngineConfig {
    /// Config with defaults for everything but the custody account.
    #[must_use]
    pub fn new(custody_account: Address) -> Self {
        Self {
            custody_account,
            duel_fee: Decimal::ZERO,
            remainder_policy: RemainderPolicy::default(),
            max_capacity: constants::MAX_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_duel_fee(mut self, fee: Decimal) -> Self {
        self.duel_fee = fee;
        self
    }

    #[must_use]
    pub fn with_remainder_policy(mut self, policy: RemainderPolicy) -> Self {
        self.remainder_policy = policy;
        self
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.custody_account.is_zero() {
            return Err(StakematchError::InvalidConfig(
                "custody_account must not be the null address".into(),
            ));
        }
        amount::ensure_whole(self.duel_fee, "duel_fee")
            .map_err(|e| StakematchError::InvalidConfig(e.to_string()))?;
        if self.max_capacity < constants::MIN_CAPACITY {
            return Err(StakematchError::InvalidConfig(format!(
                "max_capacity {} is below {}",
                self.max_capacity,
                constants::MIN_CAPACITY
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::new(Address([1; 20]));
        assert_eq!(cfg.duel_fee, Decimal::ZERO);
        assert_eq!(cfg.remainder_policy, RemainderPolicy::ToResolver);
        assert_eq!(cfg.max_capacity, 64);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let json = format!(r#"{{"custody_account":"0x{}"}}"#, "aa".repeat(20));
        let cfg = EngineConfig::from_json(&json).unwrap();
        assert_eq!(cfg.custody_account, Address([0xaa; 20]));
        assert_eq!(cfg.remainder_policy, RemainderPolicy::ToResolver);
    }

    #[test]
    fn from_json_full() {
        let json = format!(
            r#"{{"custody_account":"0x{}","duel_fee":"100","remainder_policy":"return_to_losers","max_capacity":8}}"#,
            "bb".repeat(20)
        );
        let cfg = EngineConfig::from_json(&json).unwrap();
        assert_eq!(cfg.duel_fee, Decimal::new(100, 0));
        assert_eq!(cfg.remainder_policy, RemainderPolicy::ReturnToLosers);
        assert_eq!(cfg.max_capacity, 8);
    }

    #[test]
    fn rejects_null_custody() {
        let err = EngineConfig::new(Address::ZERO).validate().unwrap_err();
        assert!(matches!(err, StakematchError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_fractional_fee() {
        let cfg = EngineConfig::new(Address([1; 20])).with_duel_fee(Decimal::new(5, 1));
        assert!(matches!(
            cfg.validate().unwrap_err(),
            StakematchError::InvalidConfig(_)
        ));
    }

    #[test]
    fn rejects_tiny_max_capacity() {
        let mut cfg = EngineConfig::new(Address([1; 20]));
        cfg.max_capacity = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, StakematchError::Serialization(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = EngineConfig::new(Address([3; 20]))
            .with_duel_fee(Decimal::new(100, 0))
            .with_remainder_policy(RemainderPolicy::Burn);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
