//! Core configuration: admission thresholds, fees, and quorum sizing.
//!
//! All monetary amounts are denominated in the ledger substrate's native
//! unit; the core never converts currencies.

use crate::error::{SuretyError, SuretyResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for the surety core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuretyConfig {
    /// Minimum stake an airline must deposit to become `Funded`.
    pub funding_minimum: Decimal,
    /// Maximum premium a passenger may escrow per policy.
    pub max_insurable: Decimal,
    /// Fee an oracle must attach when registering.
    pub oracle_registration_fee: Decimal,
    /// Distinct same-code responses required to close a request.
    pub quorum: usize,
    /// Registered-airline count below which admission is single-vote.
    pub bootstrap_airline_count: usize,
    /// Size of the oracle shard index space; indexes are drawn from
    /// `0..index_space`.
    pub index_space: u8,
    /// Event history retained by the facade before trimming.
    pub max_event_history: usize,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            funding_minimum: Decimal::from(10),
            max_insurable: Decimal::ONE,
            oracle_registration_fee: Decimal::ONE,
            quorum: 3,
            bootstrap_airline_count: 4,
            index_space: 10,
            max_event_history: 1024,
        }
    }
}

impl SuretyConfig {
    /// Override the quorum size.
    pub fn with_quorum(mut self, quorum: usize) -> Self {
        self.quorum = quorum;
        self
    }

    /// Override the funding minimum.
    pub fn with_funding_minimum(mut self, minimum: Decimal) -> Self {
        self.funding_minimum = minimum;
        self
    }

    /// Override the maximum insurable premium.
    pub fn with_max_insurable(mut self, maximum: Decimal) -> Self {
        self.max_insurable = maximum;
        self
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> SuretyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate threshold sanity.
    pub fn validate(&self) -> SuretyResult<()> {
        if self.quorum == 0 {
            return Err(SuretyError::InvalidConfig {
                reason: "quorum must be at least 1".to_string(),
            });
        }
        if self.bootstrap_airline_count == 0 {
            return Err(SuretyError::InvalidConfig {
                reason: "bootstrap airline count must be at least 1".to_string(),
            });
        }
        if self.index_space == 0 {
            return Err(SuretyError::InvalidConfig {
                reason: "index space must be non-empty".to_string(),
            });
        }
        if self.funding_minimum < Decimal::ZERO
            || self.max_insurable < Decimal::ZERO
            || self.oracle_registration_fee < Decimal::ZERO
        {
            return Err(SuretyError::InvalidConfig {
                reason: "amounts must be non-negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(SuretyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_quorum_rejected() {
        let config = SuretyConfig::default().with_quorum(0);
        assert!(matches!(
            config.validate(),
            Err(SuretyError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "funding_minimum": "10",
            "max_insurable": "1",
            "oracle_registration_fee": "1",
            "quorum": 3,
            "bootstrap_airline_count": 4,
            "index_space": 10,
            "max_event_history": 256
        }"#;
        let config = SuretyConfig::from_json(json).unwrap();
        assert_eq!(config.quorum, 3);
        assert_eq!(config.max_event_history, 256);
    }

    #[test]
    fn test_from_json_invalid_rejected() {
        let json = r#"{
            "funding_minimum": "10",
            "max_insurable": "1",
            "oracle_registration_fee": "1",
            "quorum": 0,
            "bootstrap_airline_count": 4,
            "index_space": 10,
            "max_event_history": 256
        }"#;
        assert!(SuretyConfig::from_json(json).is_err());
    }
}
