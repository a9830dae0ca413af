//! Oracle consensus engine.
//!
//! Oracles register against a fee and receive three opaque shard indexes.
//! A status fetch opens a request keyed by one sampled index; only oracles
//! holding that index may answer. Responses tally per status code, and the
//! first code to accumulate `quorum` distinct responders closes the request
//! atomically with that decision. No rollback or re-vote: a resolved
//! request is terminal.
//!
//! Response order is immaterial up to quorum; the engine never decides
//! among conflicting codes, it only recognizes the first to get there.

use crate::error::{SuretyError, SuretyResult};
use crate::oracle::sampler::IndexSampler;
use crate::types::{
    AccountId, FlightCode, FlightStatus, IndexTriple, OracleIndex, OracleRecord, OracleRequest,
    RequestKey,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of an accepted oracle response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Recorded; the request remains open.
    Recorded { tally: usize },
    /// This response reached quorum and closed the request. The caller
    /// (facade) cascades the flight-status write and insurance crediting.
    QuorumReached { status: FlightStatus, tally: usize },
}

/// Oracle registration, request matching, and quorum resolution.
pub struct OracleConsensusEngine {
    oracles: HashMap<AccountId, OracleRecord>,
    requests: HashMap<RequestKey, OracleRequest>,
    sampler: Box<dyn IndexSampler + Send>,
    registration_fee: Decimal,
    quorum: usize,
    index_space: u8,
    /// Fees retained from registrations; settled by the substrate.
    fee_total: Decimal,
}

impl OracleConsensusEngine {
    pub fn new(
        registration_fee: Decimal,
        quorum: usize,
        index_space: u8,
        sampler: Box<dyn IndexSampler + Send>,
    ) -> Self {
        Self {
            oracles: HashMap::new(),
            requests: HashMap::new(),
            sampler,
            registration_fee,
            quorum,
            index_space,
            fee_total: Decimal::ZERO,
        }
    }

    /// Register an oracle and assign its index triple.
    pub fn register_oracle(
        &mut self,
        caller: AccountId,
        fee: Decimal,
        now: DateTime<Utc>,
    ) -> SuretyResult<IndexTriple> {
        if self.oracles.contains_key(&caller) {
            return Err(SuretyError::DuplicateOracle { oracle: caller });
        }
        if fee < self.registration_fee {
            return Err(SuretyError::InsufficientFee {
                required: self.registration_fee,
                provided: fee,
            });
        }

        let indexes = self.sampler.next_triple(self.index_space);
        info!(oracle = %caller, indexes = %indexes, "oracle registered");
        self.oracles.insert(
            caller.clone(),
            OracleRecord {
                id: caller,
                indexes,
                registered_at: now,
            },
        );
        self.fee_total += fee;
        Ok(indexes)
    }

    /// The caller's assigned index triple.
    pub fn my_indexes(&self, caller: &AccountId) -> SuretyResult<IndexTriple> {
        self.oracles
            .get(caller)
            .map(|o| o.indexes)
            .ok_or_else(|| SuretyError::NotRegistered {
                caller: caller.clone(),
            })
    }

    /// Open a status-fetch request for a flight, selecting one shard index.
    /// If an open request already exists for the same flight triple, its
    /// index is returned instead of opening a parallel request, so tallies
    /// are never reset.
    pub fn open_request(
        &mut self,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> OracleIndex {
        if let Some(existing) = self.requests.iter().find(|(key, req)| {
            req.is_open
                && key.airline == airline
                && key.code == code
                && key.departure == departure
        }) {
            debug!(request = %existing.0, "request already open, reusing index");
            return existing.0.index;
        }

        let index = self.sampler.next_index(self.index_space);
        let key = RequestKey {
            index,
            airline,
            code,
            departure,
        };
        info!(request = %key, "oracle request opened");
        self.requests.insert(key, OracleRequest::open(now));
        index
    }

    /// Submit an oracle response. Checks run in a fixed order:
    /// registration, index ownership, request existence, openness,
    /// duplicate responder, then tally.
    pub fn submit_response(
        &mut self,
        index: OracleIndex,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        status: FlightStatus,
        caller: &AccountId,
    ) -> SuretyResult<ResponseOutcome> {
        let oracle = self
            .oracles
            .get(caller)
            .ok_or_else(|| SuretyError::NotRegistered {
                caller: caller.clone(),
            })?;
        if !oracle.indexes.contains(index) {
            return Err(SuretyError::IndexMismatch { index });
        }

        let key = RequestKey {
            index,
            airline,
            code,
            departure,
        };
        let request = self
            .requests
            .get_mut(&key)
            .ok_or_else(|| SuretyError::UnknownRequest {
                request: key.to_string(),
            })?;
        if !request.is_open {
            return Err(SuretyError::RequestClosed {
                request: key.to_string(),
            });
        }
        if !request.responders.insert(caller.clone()) {
            return Err(SuretyError::DuplicateResponse {
                request: key.to_string(),
                oracle: caller.clone(),
            });
        }

        let responders = request.responses.entry(status).or_default();
        responders.insert(caller.clone());
        let tally = responders.len();
        debug!(request = %key, oracle = %caller, status = %status, tally, "response recorded");

        if tally >= self.quorum {
            request.is_open = false;
            info!(request = %key, status = %status, tally, "quorum reached, request closed");
            return Ok(ResponseOutcome::QuorumReached { status, tally });
        }
        Ok(ResponseOutcome::Recorded { tally })
    }

    pub fn is_registered(&self, caller: &AccountId) -> bool {
        self.oracles.contains_key(caller)
    }

    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }

    pub fn open_request_count(&self) -> usize {
        self.requests.values().filter(|r| r.is_open).count()
    }

    pub fn resolved_request_count(&self) -> usize {
        self.requests.values().filter(|r| !r.is_open).count()
    }

    pub fn fee_total(&self) -> Decimal {
        self.fee_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::sampler::SequenceSampler;

    fn engine(sequence: Vec<u8>) -> OracleConsensusEngine {
        OracleConsensusEngine::new(
            Decimal::ONE,
            3,
            10,
            Box::new(SequenceSampler::new(sequence)),
        )
    }

    fn flight() -> (AccountId, FlightCode, DateTime<Utc>) {
        (AccountId::new("A1"), FlightCode::new("ND1309"), Utc::now())
    }

    #[test]
    fn test_registration_fee_enforced() {
        let mut eng = engine(vec![1]);
        let err = eng
            .register_oracle(AccountId::new("O1"), Decimal::ZERO, Utc::now())
            .unwrap_err();
        assert!(matches!(err, SuretyError::InsufficientFee { .. }));
        assert!(!eng.is_registered(&AccountId::new("O1")));
    }

    #[test]
    fn test_indexes_assigned_from_sampler() {
        let mut eng = engine(vec![2, 7, 9]);
        let o1 = AccountId::new("O1");
        eng.register_oracle(o1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        let triple = eng.my_indexes(&o1).unwrap();
        assert_eq!(triple.as_array().map(|i| i.value()), [2, 7, 9]);
    }

    #[test]
    fn test_my_indexes_requires_registration() {
        let eng = engine(vec![1]);
        let err = eng.my_indexes(&AccountId::new("ghost")).unwrap_err();
        assert!(matches!(err, SuretyError::NotRegistered { .. }));
    }

    #[test]
    fn test_quorum_closes_request_once() {
        // Three oracles all drawing [7, 7, 7]; the request draws 7 next.
        let mut eng = engine(vec![7]);
        let (airline, code, departure) = flight();
        for name in ["O1", "O2", "O3", "O4"] {
            eng.register_oracle(AccountId::new(name), Decimal::ONE, Utc::now())
                .unwrap();
        }
        let index = eng.open_request(airline.clone(), code.clone(), departure, Utc::now());
        assert_eq!(index.value(), 7);

        let status = FlightStatus::LateAirline;
        for (i, name) in ["O1", "O2"].iter().enumerate() {
            let outcome = eng
                .submit_response(
                    index,
                    airline.clone(),
                    code.clone(),
                    departure,
                    status,
                    &AccountId::new(*name),
                )
                .unwrap();
            assert_eq!(outcome, ResponseOutcome::Recorded { tally: i + 1 });
        }

        let outcome = eng
            .submit_response(
                index,
                airline.clone(),
                code.clone(),
                departure,
                status,
                &AccountId::new("O3"),
            )
            .unwrap();
        assert_eq!(outcome, ResponseOutcome::QuorumReached { status, tally: 3 });

        // A fourth submission of any code fails with RequestClosed.
        let err = eng
            .submit_response(
                index,
                airline,
                code,
                departure,
                FlightStatus::OnTime,
                &AccountId::new("O4"),
            )
            .unwrap_err();
        assert!(matches!(err, SuretyError::RequestClosed { .. }));
        assert_eq!(eng.resolved_request_count(), 1);
    }

    #[test]
    fn test_index_mismatch_rejected() {
        let mut eng = OracleConsensusEngine::new(
            Decimal::ONE,
            3,
            10,
            // O1 draws [2, 7, 9]; the request draws 3.
            Box::new(SequenceSampler::new(vec![2, 7, 9, 3])),
        );
        let (airline, code, departure) = flight();
        let o1 = AccountId::new("O1");
        eng.register_oracle(o1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        let index = eng.open_request(airline.clone(), code.clone(), departure, Utc::now());
        assert_eq!(index.value(), 3);

        let err = eng
            .submit_response(index, airline, code, departure, FlightStatus::OnTime, &o1)
            .unwrap_err();
        assert!(matches!(err, SuretyError::IndexMismatch { .. }));
    }

    #[test]
    fn test_duplicate_response_any_code_rejected() {
        let mut eng = engine(vec![5]);
        let (airline, code, departure) = flight();
        let o1 = AccountId::new("O1");
        eng.register_oracle(o1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        let index = eng.open_request(airline.clone(), code.clone(), departure, Utc::now());

        eng.submit_response(
            index,
            airline.clone(),
            code.clone(),
            departure,
            FlightStatus::OnTime,
            &o1,
        )
        .unwrap();
        // Same oracle, different code: still a duplicate.
        let err = eng
            .submit_response(
                index,
                airline,
                code,
                departure,
                FlightStatus::LateAirline,
                &o1,
            )
            .unwrap_err();
        assert!(matches!(err, SuretyError::DuplicateResponse { .. }));
    }

    #[test]
    fn test_unknown_request_rejected() {
        let mut eng = engine(vec![5]);
        let (airline, code, departure) = flight();
        let o1 = AccountId::new("O1");
        eng.register_oracle(o1.clone(), Decimal::ONE, Utc::now())
            .unwrap();
        let err = eng
            .submit_response(
                OracleIndex(5),
                airline,
                code,
                departure,
                FlightStatus::OnTime,
                &o1,
            )
            .unwrap_err();
        assert!(matches!(err, SuretyError::UnknownRequest { .. }));
    }

    #[test]
    fn test_refetch_reuses_open_request() {
        let mut eng = engine(vec![4, 8]);
        let (airline, code, departure) = flight();
        let first = eng.open_request(airline.clone(), code.clone(), departure, Utc::now());
        let second = eng.open_request(airline, code, departure, Utc::now());
        assert_eq!(first, second);
        assert_eq!(eng.open_request_count(), 1);
    }
}
