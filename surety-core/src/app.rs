//! Surety facade - unified entry points.
//!
//! Owns the five components and exposes every operation with caller
//! identity as an explicit parameter. Mutating operations check the
//! operational gate first; queries never do. Quorum resolutions cascade
//! from the oracle engine into the flight registry and the insurance
//! ledger here, so no component bypasses another's ownership.

use crate::config::SuretyConfig;
use crate::error::{SuretyError, SuretyResult};
use crate::gate::OperationalGate;
use crate::insurance::InsuranceLedger;
use crate::oracle::{IndexSampler, OracleConsensusEngine, RandomSampler, ResponseOutcome};
use crate::registry::{AdmissionOutcome, AirlineRegistry, FlightRegistry, VoteOutcome};
use crate::types::{
    AccountId, FlightCode, FlightKey, FlightStatus, IndexTriple, OracleIndex,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

/// The surety core: governance, flights, escrow, and oracle consensus
/// behind one gate-checked surface.
pub struct SuretyApp {
    config: SuretyConfig,
    gate: OperationalGate,
    airlines: AirlineRegistry,
    flights: FlightRegistry,
    insurance: InsuranceLedger,
    oracles: OracleConsensusEngine,
    events: Vec<SuretyEvent>,
}

impl SuretyApp {
    /// Create the core with an entropy-backed index sampler. `admin` owns
    /// the operational gate; `first_airline` is seeded as the genesis
    /// registered airline.
    pub fn new(
        config: SuretyConfig,
        admin: AccountId,
        first_airline: AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<Self> {
        Self::with_sampler(config, admin, first_airline, now, Box::new(RandomSampler::new()))
    }

    /// Create the core with an injected index sampler (deterministic tests).
    pub fn with_sampler(
        config: SuretyConfig,
        admin: AccountId,
        first_airline: AccountId,
        now: DateTime<Utc>,
        sampler: Box<dyn IndexSampler + Send>,
    ) -> SuretyResult<Self> {
        config.validate()?;

        let mut airlines =
            AirlineRegistry::new(config.bootstrap_airline_count, config.funding_minimum);
        airlines.seed(first_airline, now);

        let oracles = OracleConsensusEngine::new(
            config.oracle_registration_fee,
            config.quorum,
            config.index_space,
            sampler,
        );

        Ok(Self {
            insurance: InsuranceLedger::new(config.max_insurable),
            flights: FlightRegistry::new(),
            gate: OperationalGate::new(admin),
            airlines,
            oracles,
            events: Vec::new(),
            config,
        })
    }

    // ============================================================
    // Operational gate
    // ============================================================

    /// Current operating status. No side effect.
    pub fn is_operational(&self) -> bool {
        self.gate.is_operational()
    }

    /// Flip the operating status (admin only). Deliberately not gated on
    /// itself so the admin can always re-open.
    pub fn set_operating_status(&mut self, value: bool, caller: &AccountId) -> SuretyResult<()> {
        self.gate.set_operating_status(value, caller)
    }

    // ============================================================
    // Airline registry
    // ============================================================

    /// Register a candidate airline, sponsored by a registered caller.
    pub fn register_airline(
        &mut self,
        candidate: AccountId,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<AdmissionOutcome> {
        self.gate.require_operational()?;
        let outcome = self
            .airlines
            .register_airline(candidate.clone(), caller, now)?;
        self.log_event(SuretyEvent::AirlineRegistered {
            airline: candidate,
            sponsor: caller.clone(),
            immediate: outcome == AdmissionOutcome::Registered,
            timestamp: now,
        });
        Ok(outcome)
    }

    /// Vote for an `Applied` candidate.
    pub fn vote(
        &mut self,
        candidate: &AccountId,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<VoteOutcome> {
        self.gate.require_operational()?;
        let outcome = self.airlines.vote(candidate, caller)?;
        self.log_event(SuretyEvent::AirlineVoted {
            candidate: candidate.clone(),
            voter: caller.clone(),
            timestamp: now,
        });
        if let VoteOutcome::Promoted { votes } = outcome {
            self.log_event(SuretyEvent::AirlinePromoted {
                airline: candidate.clone(),
                votes,
                timestamp: now,
            });
        }
        Ok(outcome)
    }

    /// Deposit the participation stake.
    pub fn fund_airline(
        &mut self,
        caller: &AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> SuretyResult<()> {
        self.gate.require_operational()?;
        self.airlines.fund_airline(caller, amount)?;
        self.log_event(SuretyEvent::AirlineFunded {
            airline: caller.clone(),
            amount,
            timestamp: now,
        });
        Ok(())
    }

    pub fn is_airline(&self, id: &AccountId) -> bool {
        self.airlines.is_airline(id)
    }

    pub fn is_funded(&self, id: &AccountId) -> bool {
        self.airlines.is_funded(id)
    }

    // ============================================================
    // Flight registry
    // ============================================================

    /// Register a flight. Only the owning airline, and only once funded.
    pub fn register_flight(
        &mut self,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<()> {
        self.gate.require_operational()?;
        if !self.airlines.is_funded(&airline) {
            return Err(SuretyError::Unauthorized {
                caller: caller.clone(),
                action: "register a flight without a funded airline".to_string(),
            });
        }
        let key = FlightKey::new(airline, code, departure);
        self.flights.register_flight(key.clone(), caller, now)?;
        self.log_event(SuretyEvent::FlightRegistered {
            flight: key,
            timestamp: now,
        });
        Ok(())
    }

    pub fn flight_status(
        &self,
        airline: &AccountId,
        code: &FlightCode,
        departure: DateTime<Utc>,
    ) -> Option<FlightStatus> {
        self.flights
            .status_of(&FlightKey::new(airline.clone(), code.clone(), departure))
    }

    // ============================================================
    // Insurance ledger
    // ============================================================

    /// Escrow an insurance premium for a registered flight.
    pub fn buy_insurance(
        &mut self,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        passenger: AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> SuretyResult<()> {
        self.gate.require_operational()?;
        let key = FlightKey::new(airline, code, departure);
        if !self.flights.is_registered(&key) {
            return Err(SuretyError::UnknownFlight {
                flight: key.to_string(),
            });
        }
        self.insurance
            .buy_insurance(&key, passenger.clone(), amount, now)?;
        self.log_event(SuretyEvent::InsurancePurchased {
            flight: key,
            passenger,
            amount,
            timestamp: now,
        });
        Ok(())
    }

    pub fn is_insured(
        &self,
        airline: &AccountId,
        code: &FlightCode,
        departure: DateTime<Utc>,
        passenger: &AccountId,
    ) -> bool {
        let key = FlightKey::new(airline.clone(), code.clone(), departure);
        self.insurance.is_insured(&key, passenger)
    }

    pub fn is_credited(
        &self,
        airline: &AccountId,
        code: &FlightCode,
        departure: DateTime<Utc>,
        passenger: &AccountId,
    ) -> bool {
        let key = FlightKey::new(airline.clone(), code.clone(), departure);
        self.insurance.is_credited(&key, passenger)
    }

    // ============================================================
    // Oracle consensus
    // ============================================================

    /// Register an oracle against the registration fee.
    pub fn register_oracle(
        &mut self,
        caller: AccountId,
        fee: Decimal,
        now: DateTime<Utc>,
    ) -> SuretyResult<IndexTriple> {
        self.gate.require_operational()?;
        let indexes = self.oracles.register_oracle(caller.clone(), fee, now)?;
        self.log_event(SuretyEvent::OracleRegistered {
            oracle: caller,
            indexes,
            timestamp: now,
        });
        Ok(indexes)
    }

    /// The caller's assigned index triple. Pure query.
    pub fn my_indexes(&self, caller: &AccountId) -> SuretyResult<IndexTriple> {
        self.oracles.my_indexes(caller)
    }

    /// Open a flight-status request. The emitted `OracleRequestOpened`
    /// event is the notification external oracle agents observe.
    pub fn fetch_flight_status(
        &mut self,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SuretyResult<OracleIndex> {
        self.gate.require_operational()?;
        let index = self
            .oracles
            .open_request(airline.clone(), code.clone(), departure, now);
        self.log_event(SuretyEvent::OracleRequestOpened {
            index,
            airline,
            code,
            departure,
            timestamp: now,
        });
        Ok(index)
    }

    /// Submit an oracle response. When this response reaches quorum the
    /// flight status is set exactly once and insured passengers on a
    /// `LateAirline` outcome are credited, all within this call.
    pub fn submit_oracle_response(
        &mut self,
        index: OracleIndex,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        status: FlightStatus,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<ResponseOutcome> {
        self.gate.require_operational()?;
        let outcome = self.oracles.submit_response(
            index,
            airline.clone(),
            code.clone(),
            departure,
            status,
            caller,
        )?;

        if let ResponseOutcome::QuorumReached { status, .. } = outcome {
            let key = FlightKey::new(airline, code, departure);
            if self.flights.is_registered(&key) {
                self.flights.set_status(&key, status)?;
                self.log_event(SuretyEvent::FlightStatusResolved {
                    flight: key.clone(),
                    status,
                    timestamp: now,
                });

                let credited = self.insurance.on_flight_resolved(&key, status);
                if !credited.is_empty() {
                    self.log_event(SuretyEvent::PoliciesCredited {
                        flight: key,
                        passengers: credited,
                        timestamp: now,
                    });
                }
            } else {
                // A request can be opened for a flight that was never
                // registered; the resolution then has nothing to write.
                warn!(flight = %key, status = %status, "quorum reached for unregistered flight");
            }
        }

        Ok(outcome)
    }

    // ============================================================
    // Introspection
    // ============================================================

    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    /// Full event history (oldest first, trimmed to the configured cap).
    pub fn events(&self) -> &[SuretyEvent] {
        &self.events
    }

    /// Events at or after `since`.
    pub fn events_since(&self, since: &DateTime<Utc>) -> Vec<&SuretyEvent> {
        self.events
            .iter()
            .filter(|e| e.timestamp() >= since)
            .collect()
    }

    /// Table counts and escrow totals.
    pub fn stats(&self) -> SuretyStats {
        SuretyStats {
            airlines: self.airlines.airline_count(),
            registered_airlines: self.airlines.registered_count(),
            flights: self.flights.flight_count(),
            policies: self.insurance.policy_count(),
            oracles: self.oracles.oracle_count(),
            open_requests: self.oracles.open_request_count(),
            resolved_requests: self.oracles.resolved_request_count(),
            stake_total: self.airlines.stake_total(),
            escrow_total: self.insurance.escrow_total(),
            total_events: self.events.len(),
        }
    }

    fn log_event(&mut self, event: SuretyEvent) {
        self.events.push(event);
        if self.events.len() > self.config.max_event_history {
            self.events.remove(0);
        }
    }
}

/// Facade event, appended on every committed transition.
#[derive(Clone, Debug)]
pub enum SuretyEvent {
    AirlineRegistered {
        airline: AccountId,
        sponsor: AccountId,
        immediate: bool,
        timestamp: DateTime<Utc>,
    },
    AirlineVoted {
        candidate: AccountId,
        voter: AccountId,
        timestamp: DateTime<Utc>,
    },
    AirlinePromoted {
        airline: AccountId,
        votes: usize,
        timestamp: DateTime<Utc>,
    },
    AirlineFunded {
        airline: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    FlightRegistered {
        flight: FlightKey,
        timestamp: DateTime<Utc>,
    },
    InsurancePurchased {
        flight: FlightKey,
        passenger: AccountId,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    OracleRegistered {
        oracle: AccountId,
        indexes: IndexTriple,
        timestamp: DateTime<Utc>,
    },
    OracleRequestOpened {
        index: OracleIndex,
        airline: AccountId,
        code: FlightCode,
        departure: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
    FlightStatusResolved {
        flight: FlightKey,
        status: FlightStatus,
        timestamp: DateTime<Utc>,
    },
    PoliciesCredited {
        flight: FlightKey,
        passengers: Vec<AccountId>,
        timestamp: DateTime<Utc>,
    },
}

impl SuretyEvent {
    /// Event timestamp.
    pub fn timestamp(&self) -> &DateTime<Utc> {
        match self {
            SuretyEvent::AirlineRegistered { timestamp, .. } => timestamp,
            SuretyEvent::AirlineVoted { timestamp, .. } => timestamp,
            SuretyEvent::AirlinePromoted { timestamp, .. } => timestamp,
            SuretyEvent::AirlineFunded { timestamp, .. } => timestamp,
            SuretyEvent::FlightRegistered { timestamp, .. } => timestamp,
            SuretyEvent::InsurancePurchased { timestamp, .. } => timestamp,
            SuretyEvent::OracleRegistered { timestamp, .. } => timestamp,
            SuretyEvent::OracleRequestOpened { timestamp, .. } => timestamp,
            SuretyEvent::FlightStatusResolved { timestamp, .. } => timestamp,
            SuretyEvent::PoliciesCredited { timestamp, .. } => timestamp,
        }
    }
}

/// Facade statistics.
#[derive(Clone, Debug)]
pub struct SuretyStats {
    pub airlines: usize,
    pub registered_airlines: usize,
    pub flights: usize,
    pub policies: usize,
    pub oracles: usize,
    pub open_requests: usize,
    pub resolved_requests: usize,
    pub stake_total: Decimal,
    pub escrow_total: Decimal,
    pub total_events: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::SequenceSampler;

    fn app() -> SuretyApp {
        SuretyApp::with_sampler(
            SuretyConfig::default(),
            AccountId::new("admin"),
            AccountId::new("A1"),
            Utc::now(),
            Box::new(SequenceSampler::new(vec![7])),
        )
        .unwrap()
    }

    #[test]
    fn test_gate_blocks_mutations_not_queries() {
        let mut app = app();
        let admin = AccountId::new("admin");
        app.set_operating_status(false, &admin).unwrap();

        let now = Utc::now();
        let err = app
            .register_airline(AccountId::new("A2"), &AccountId::new("A1"), now)
            .unwrap_err();
        assert_eq!(err, SuretyError::OperationBlocked);

        let err = app
            .fund_airline(&AccountId::new("A1"), Decimal::from(10), now)
            .unwrap_err();
        assert_eq!(err, SuretyError::OperationBlocked);

        let err = app
            .register_oracle(AccountId::new("O1"), Decimal::ONE, now)
            .unwrap_err();
        assert_eq!(err, SuretyError::OperationBlocked);

        // Queries still answer.
        assert!(!app.is_operational());
        assert!(app.is_airline(&AccountId::new("A1")));

        app.set_operating_status(true, &admin).unwrap();
        app.register_airline(AccountId::new("A2"), &AccountId::new("A1"), now)
            .unwrap();
    }

    #[test]
    fn test_flight_requires_funded_airline() {
        let mut app = app();
        let a1 = AccountId::new("A1");
        let now = Utc::now();

        let err = app
            .register_flight(a1.clone(), FlightCode::new("ND1309"), now, &a1, now)
            .unwrap_err();
        assert!(matches!(err, SuretyError::Unauthorized { .. }));

        app.fund_airline(&a1, Decimal::from(10), now).unwrap();
        app.register_flight(a1.clone(), FlightCode::new("ND1309"), now, &a1, now)
            .unwrap();
        assert_eq!(
            app.flight_status(&a1, &FlightCode::new("ND1309"), now),
            Some(FlightStatus::Unknown)
        );
    }

    #[test]
    fn test_insurance_requires_registered_flight() {
        let mut app = app();
        let now = Utc::now();
        let err = app
            .buy_insurance(
                AccountId::new("A1"),
                FlightCode::new("ghost"),
                now,
                AccountId::new("P1"),
                Decimal::ONE,
                now,
            )
            .unwrap_err();
        assert!(matches!(err, SuretyError::UnknownFlight { .. }));
    }

    #[test]
    fn test_fetch_emits_request_opened_event() {
        let mut app = app();
        let now = Utc::now();
        let index = app
            .fetch_flight_status(AccountId::new("A1"), FlightCode::new("ND1309"), now, now)
            .unwrap();
        assert_eq!(index.value(), 7);
        assert!(app
            .events()
            .iter()
            .any(|e| matches!(e, SuretyEvent::OracleRequestOpened { .. })));
    }

    #[test]
    fn test_event_history_trimmed() {
        let mut config = SuretyConfig::default();
        config.max_event_history = 2;
        let mut app = SuretyApp::with_sampler(
            config,
            AccountId::new("admin"),
            AccountId::new("A1"),
            Utc::now(),
            Box::new(SequenceSampler::new(vec![7])),
        )
        .unwrap();

        let now = Utc::now();
        for name in ["A2", "A3", "A4"] {
            app.register_airline(AccountId::new(name), &AccountId::new("A1"), now)
                .unwrap();
        }
        assert_eq!(app.events().len(), 2);
    }
}
