//! Airline admission and funding state.

use super::common::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Admission status of an airline.
///
/// `Applied -> Registered -> Funded`, strictly forward. An airline admitted
/// during the bootstrap phase skips `Applied` entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirlineStatus {
    /// Awaiting admission votes.
    Applied,
    /// Admitted; may vote and sponsor candidates, but not register flights.
    Registered,
    /// Stake deposited; full participation rights.
    Funded,
}

impl AirlineStatus {
    /// Whether this airline counts toward the registered total and may vote.
    pub fn is_registered(&self) -> bool {
        matches!(self, AirlineStatus::Registered | AirlineStatus::Funded)
    }
}

/// Airline record owned by the airline registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AirlineRecord {
    pub id: AccountId,
    pub status: AirlineStatus,
    /// Distinct voter identities received while `Applied`.
    pub votes: HashSet<AccountId>,
    pub created_at: DateTime<Utc>,
}

impl AirlineRecord {
    pub fn new(id: AccountId, status: AirlineStatus, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status,
            votes: HashSet::new(),
            created_at: now,
        }
    }
}
