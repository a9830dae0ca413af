//! Oracle identity, shard indexes, and request tallies.

use super::common::AccountId;
use super::flight::{FlightCode, FlightKey, FlightStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Opaque shard bucket an oracle may answer for. Indexes are drawn from a
/// bounded space and are not unique per oracle; collisions are expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleIndex(pub u8);

impl OracleIndex {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for OracleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered triple of shard indexes assigned at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexTriple(pub [OracleIndex; 3]);

impl IndexTriple {
    pub fn new(a: OracleIndex, b: OracleIndex, c: OracleIndex) -> Self {
        Self([a, b, c])
    }

    pub fn contains(&self, index: OracleIndex) -> bool {
        self.0.contains(&index)
    }

    pub fn as_array(&self) -> [OracleIndex; 3] {
        self.0
    }
}

impl std::fmt::Display for IndexTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

/// Oracle record owned by the consensus engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleRecord {
    pub id: AccountId,
    pub indexes: IndexTriple,
    pub registered_at: DateTime<Utc>,
}

/// Composite request key: (index, airline, flight code, departure slot).
/// Only oracles holding `index` may answer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub index: OracleIndex,
    pub airline: AccountId,
    pub code: FlightCode,
    pub departure: DateTime<Utc>,
}

impl RequestKey {
    /// The flight this request resolves.
    pub fn flight_key(&self) -> FlightKey {
        FlightKey::new(self.airline.clone(), self.code.clone(), self.departure)
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}/{}@{}",
            self.index,
            self.airline,
            self.code,
            self.departure.timestamp()
        )
    }
}

/// Per-request tally state. `Open -> Resolved`, terminal; a resolved
/// request never reopens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Distinct responders per status code.
    pub responses: HashMap<FlightStatus, HashSet<AccountId>>,
    /// Every oracle that responded, any code. One response per oracle.
    pub responders: HashSet<AccountId>,
    pub is_open: bool,
    pub opened_at: DateTime<Utc>,
}

impl OracleRequest {
    pub fn open(now: DateTime<Utc>) -> Self {
        Self {
            responses: HashMap::new(),
            responders: HashSet::new(),
            is_open: true,
            opened_at: now,
        }
    }

    /// Count of distinct responses recorded for `status`.
    pub fn tally(&self, status: FlightStatus) -> usize {
        self.responses.get(&status).map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_contains() {
        let triple = IndexTriple::new(OracleIndex(2), OracleIndex(7), OracleIndex(9));
        assert!(triple.contains(OracleIndex(7)));
        assert!(!triple.contains(OracleIndex(3)));
    }

    #[test]
    fn test_request_tally_empty() {
        let req = OracleRequest::open(Utc::now());
        assert_eq!(req.tally(FlightStatus::LateAirline), 0);
        assert!(req.is_open);
    }
}
