//! Passenger insurance policy records.

use super::common::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An escrowed insurance policy for one (flight, passenger) pair.
///
/// `credited` flips to true exactly once, when the flight resolves to
/// `LateAirline`. The payout amount and withdrawal path are the ledger
/// substrate's concern; the core only records eligibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub passenger: AccountId,
    pub amount_paid: Decimal,
    pub credited: bool,
    pub purchased_at: DateTime<Utc>,
}

impl InsurancePolicy {
    pub fn new(passenger: AccountId, amount_paid: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            passenger,
            amount_paid,
            credited: false,
            purchased_at: now,
        }
    }
}
