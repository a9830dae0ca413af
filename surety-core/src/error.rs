//! Surety Error Code Registry
//!
//! Error code format: SURETY-{module}-{sequence}
//! - SURETY-GATE: Operational gate and authorization violations
//! - SURETY-AIR: Airline registry errors
//! - SURETY-FLT: Flight registry errors
//! - SURETY-INS: Insurance ledger errors
//! - SURETY-ORC: Oracle consensus errors
//! - SURETY-CFG: Configuration errors
//!
//! Every failure is a rejected transition: state prior to the call is left
//! unchanged and the error is surfaced synchronously to the caller. The core
//! performs no retries. `RequestClosed` is a normal outcome for an oracle
//! agent that answers after quorum; collaborators are expected to swallow it
//! and keep polling.

use crate::types::{AccountId, OracleIndex};
use rust_decimal::Decimal;
use thiserror::Error;

/// Surety Result type
pub type SuretyResult<T> = Result<T, SuretyError>;

/// Surety Error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuretyError {
    // ============================================================
    // Gate Errors (SURETY-GATE-*)
    // ============================================================
    /// [SURETY-GATE-001] Operational gate is down
    #[error("[SURETY-GATE-001] Operation blocked: contract is not operational")]
    OperationBlocked,

    /// [SURETY-GATE-002] Caller is not authorized for the action
    #[error("[SURETY-GATE-002] Caller {caller} is not authorized to {action}")]
    Unauthorized { caller: AccountId, action: String },

    // ============================================================
    // Airline Registry Errors (SURETY-AIR-*)
    // ============================================================
    /// [SURETY-AIR-001] Airline not found
    #[error("[SURETY-AIR-001] Airline {airline} is not known to the registry")]
    UnknownAirline { airline: AccountId },

    /// [SURETY-AIR-002] Airline already registered or applied
    #[error("[SURETY-AIR-002] Airline {airline} already exists in the registry")]
    DuplicateAirline { airline: AccountId },

    /// [SURETY-AIR-003] Voter already voted for this candidate
    #[error("[SURETY-AIR-003] Voter {voter} already voted for candidate {candidate}")]
    DuplicateVote {
        candidate: AccountId,
        voter: AccountId,
    },

    /// [SURETY-AIR-004] Funding payment below the fixed threshold
    #[error("[SURETY-AIR-004] Insufficient funds: required {required}, provided {provided}")]
    InsufficientFunds {
        required: Decimal,
        provided: Decimal,
    },

    // ============================================================
    // Flight Registry Errors (SURETY-FLT-*)
    // ============================================================
    /// [SURETY-FLT-001] Flight key not registered
    #[error("[SURETY-FLT-001] Flight {flight} is not registered")]
    UnknownFlight { flight: String },

    /// [SURETY-FLT-002] Flight key already registered
    #[error("[SURETY-FLT-002] Flight {flight} is already registered")]
    DuplicateFlight { flight: String },

    // ============================================================
    // Insurance Ledger Errors (SURETY-INS-*)
    // ============================================================
    /// [SURETY-INS-001] Premium above the maximum insurable amount
    #[error("[SURETY-INS-001] Premium {requested} exceeds maximum insurable amount {maximum}")]
    ExceedsMaxInsurable {
        maximum: Decimal,
        requested: Decimal,
    },

    /// [SURETY-INS-002] Passenger already holds a policy for this flight
    #[error("[SURETY-INS-002] Passenger {passenger} already holds a policy for flight {flight}")]
    DuplicatePolicy {
        flight: String,
        passenger: AccountId,
    },

    // ============================================================
    // Oracle Consensus Errors (SURETY-ORC-*)
    // ============================================================
    /// [SURETY-ORC-001] Oracle registration fee below the fixed threshold
    #[error("[SURETY-ORC-001] Insufficient fee: required {required}, provided {provided}")]
    InsufficientFee {
        required: Decimal,
        provided: Decimal,
    },

    /// [SURETY-ORC-002] Caller is not a registered oracle
    #[error("[SURETY-ORC-002] Account {caller} is not a registered oracle")]
    NotRegistered { caller: AccountId },

    /// [SURETY-ORC-003] Oracle already registered
    #[error("[SURETY-ORC-003] Oracle {oracle} is already registered")]
    DuplicateOracle { oracle: AccountId },

    /// [SURETY-ORC-004] Submitted index is not one of the caller's shards
    #[error("[SURETY-ORC-004] Index {index} is not assigned to the responding oracle")]
    IndexMismatch { index: OracleIndex },

    /// [SURETY-ORC-005] No request exists for the submitted key
    #[error("[SURETY-ORC-005] No oracle request open for {request}")]
    UnknownRequest { request: String },

    /// [SURETY-ORC-006] Oracle already responded to this request
    #[error("[SURETY-ORC-006] Oracle {oracle} already responded to request {request}")]
    DuplicateResponse { request: String, oracle: AccountId },

    /// [SURETY-ORC-007] Request already resolved by quorum
    #[error("[SURETY-ORC-007] Request {request} is closed")]
    RequestClosed { request: String },

    // ============================================================
    // Configuration Errors (SURETY-CFG-*)
    // ============================================================
    /// [SURETY-CFG-001] Configuration failed validation
    #[error("[SURETY-CFG-001] Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SuretyError {
    fn from(err: serde_json::Error) -> Self {
        SuretyError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_in_messages() {
        let err = SuretyError::OperationBlocked;
        assert!(err.to_string().contains("SURETY-GATE-001"));

        let err = SuretyError::InsufficientFunds {
            required: Decimal::from(10),
            provided: Decimal::from(2),
        };
        assert!(err.to_string().contains("required 10"));
        assert!(err.to_string().contains("provided 2"));
    }

    #[test]
    fn test_request_closed_is_comparable() {
        // Collaborators match on this variant to swallow late submissions.
        let a = SuretyError::RequestClosed {
            request: "7/AL1/ND1309".to_string(),
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
