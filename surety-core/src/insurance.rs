//! Insurance ledger: passenger premium escrow and resolution crediting.
//!
//! Policies are created on purchase and credited at most once, when the
//! insured flight resolves to `LateAirline`. Any other terminal code leaves
//! the policies uncredited permanently. Payout amounts and withdrawal are
//! the ledger substrate's concern; the core tracks eligibility and the
//! escrowed total.

use crate::error::{SuretyError, SuretyResult};
use crate::types::{AccountId, FlightKey, FlightStatus, InsurancePolicy};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Escrowed policies keyed by flight, then passenger.
#[derive(Debug)]
pub struct InsuranceLedger {
    policies: HashMap<FlightKey, BTreeMap<AccountId, InsurancePolicy>>,
    max_insurable: Decimal,
    escrow_total: Decimal,
}

impl InsuranceLedger {
    pub fn new(max_insurable: Decimal) -> Self {
        Self {
            policies: HashMap::new(),
            max_insurable,
            escrow_total: Decimal::ZERO,
        }
    }

    /// Escrow a premium for (flight, passenger). The facade has already
    /// verified the flight is registered and the gate is up.
    pub fn buy_insurance(
        &mut self,
        key: &FlightKey,
        passenger: AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> SuretyResult<()> {
        if amount > self.max_insurable {
            return Err(SuretyError::ExceedsMaxInsurable {
                maximum: self.max_insurable,
                requested: amount,
            });
        }

        let flight_policies = self.policies.entry(key.clone()).or_default();
        if flight_policies.contains_key(&passenger) {
            return Err(SuretyError::DuplicatePolicy {
                flight: key.to_string(),
                passenger,
            });
        }

        info!(flight = %key, passenger = %passenger, amount = %amount, "insurance purchased");
        flight_policies.insert(
            passenger.clone(),
            InsurancePolicy::new(passenger, amount, now),
        );
        self.escrow_total += amount;
        Ok(())
    }

    /// Resolution hook. Credits every uncredited policy on the flight iff
    /// the outcome is payable; returns the passengers credited by this call.
    /// Replaying a resolution is harmless: already-credited policies are
    /// skipped.
    pub fn on_flight_resolved(&mut self, key: &FlightKey, status: FlightStatus) -> Vec<AccountId> {
        if !status.is_payable() {
            return Vec::new();
        }

        let mut credited = Vec::new();
        if let Some(flight_policies) = self.policies.get_mut(key) {
            for (passenger, policy) in flight_policies.iter_mut() {
                if !policy.credited {
                    policy.credited = true;
                    credited.push(passenger.clone());
                }
            }
        }
        if !credited.is_empty() {
            info!(flight = %key, count = credited.len(), "policies credited");
        }
        credited
    }

    pub fn is_insured(&self, key: &FlightKey, passenger: &AccountId) -> bool {
        self.policies
            .get(key)
            .map(|p| p.contains_key(passenger))
            .unwrap_or(false)
    }

    pub fn is_credited(&self, key: &FlightKey, passenger: &AccountId) -> bool {
        self.policies
            .get(key)
            .and_then(|p| p.get(passenger))
            .map(|p| p.credited)
            .unwrap_or(false)
    }

    pub fn policy_count(&self) -> usize {
        self.policies.values().map(|p| p.len()).sum()
    }

    pub fn escrow_total(&self) -> Decimal {
        self.escrow_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlightCode;

    fn key() -> FlightKey {
        FlightKey::new(
            AccountId::new("A1"),
            FlightCode::new("ND1309"),
            Utc::now(),
        )
    }

    fn ledger() -> InsuranceLedger {
        InsuranceLedger::new(Decimal::ONE)
    }

    #[test]
    fn test_cap_enforced() {
        let mut ledger = ledger();
        let err = ledger
            .buy_insurance(&key(), AccountId::new("P1"), Decimal::from(2), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SuretyError::ExceedsMaxInsurable { .. }));

        // At the cap succeeds.
        ledger
            .buy_insurance(&key(), AccountId::new("P1"), Decimal::ONE, Utc::now())
            .unwrap();
    }

    #[test]
    fn test_duplicate_policy_rejected() {
        let mut ledger = ledger();
        let key = key();
        let p1 = AccountId::new("P1");
        ledger
            .buy_insurance(&key, p1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        let err = ledger
            .buy_insurance(&key, p1, Decimal::ONE, Utc::now())
            .unwrap_err();
        assert!(matches!(err, SuretyError::DuplicatePolicy { .. }));
    }

    #[test]
    fn test_credit_on_late_airline_only() {
        let mut ledger = ledger();
        let key = key();
        let p1 = AccountId::new("P1");
        let p2 = AccountId::new("P2");
        ledger
            .buy_insurance(&key, p1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        ledger
            .buy_insurance(&key, p2.clone(), Decimal::new(5, 1), Utc::now())
            .unwrap();

        // Non-payable code credits nobody, permanently.
        assert!(ledger
            .on_flight_resolved(&key, FlightStatus::LateWeather)
            .is_empty());
        assert!(!ledger.is_credited(&key, &p1));

        let credited = ledger.on_flight_resolved(&key, FlightStatus::LateAirline);
        assert_eq!(credited, vec![p1.clone(), p2.clone()]);
        assert!(ledger.is_credited(&key, &p1));
        assert!(ledger.is_credited(&key, &p2));

        // Replay credits nobody twice.
        assert!(ledger
            .on_flight_resolved(&key, FlightStatus::LateAirline)
            .is_empty());
    }

    #[test]
    fn test_escrow_total_accumulates() {
        let mut ledger = ledger();
        let key = key();
        ledger
            .buy_insurance(&key, AccountId::new("P1"), Decimal::ONE, Utc::now())
            .unwrap();
        ledger
            .buy_insurance(&key, AccountId::new("P2"), Decimal::new(5, 1), Utc::now())
            .unwrap();
        assert_eq!(ledger.escrow_total(), Decimal::new(15, 1));
    }
}
