//! Airline registry: multiparty admission voting and funding.
//!
//! Admission is single-sponsor while fewer than `bootstrap_airline_count`
//! airlines are registered (there is nobody to hold a vote against), and
//! majority-vote afterwards: a candidate is promoted once its distinct vote
//! count strictly exceeds half the registered total. 2-of-4 does not
//! promote; 3-of-4 does.
//!
//! Voting policy: any `Registered` airline may vote and sponsor, funded or
//! not. Funding only gates flight registration.

use crate::error::{SuretyError, SuretyResult};
use crate::types::{AccountId, AirlineRecord, AirlineStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of a registration request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Admitted immediately (bootstrap phase).
    Registered,
    /// Queued for votes.
    Applied,
}

/// Outcome of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Vote recorded; candidate still `Applied`.
    Recorded { votes: usize },
    /// Vote recorded and the candidate crossed the majority threshold.
    Promoted { votes: usize },
}

/// Admission and funding state of all airlines.
#[derive(Debug)]
pub struct AirlineRegistry {
    airlines: HashMap<AccountId, AirlineRecord>,
    registered_count: usize,
    bootstrap_count: usize,
    funding_minimum: Decimal,
    /// Stake retained from funding payments; settled by the substrate.
    stake_total: Decimal,
}

impl AirlineRegistry {
    pub fn new(bootstrap_count: usize, funding_minimum: Decimal) -> Self {
        Self {
            airlines: HashMap::new(),
            registered_count: 0,
            bootstrap_count,
            funding_minimum,
            stake_total: Decimal::ZERO,
        }
    }

    /// Admit the genesis airline unconditionally. Without a seed there is no
    /// registered caller to sponsor the first registration.
    pub fn seed(&mut self, airline: AccountId, now: DateTime<Utc>) {
        if self.airlines.contains_key(&airline) {
            return;
        }
        info!(airline = %airline, "genesis airline seeded");
        self.airlines.insert(
            airline.clone(),
            AirlineRecord::new(airline, AirlineStatus::Registered, now),
        );
        self.registered_count += 1;
    }

    /// Register a candidate airline, sponsored by an existing one.
    pub fn register_airline(
        &mut self,
        candidate: AccountId,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<AdmissionOutcome> {
        self.ensure_voter(caller, "register an airline")?;

        if self.airlines.contains_key(&candidate) {
            return Err(SuretyError::DuplicateAirline { airline: candidate });
        }

        let outcome = if self.registered_count < self.bootstrap_count {
            self.registered_count += 1;
            info!(airline = %candidate, sponsor = %caller, "airline registered (bootstrap)");
            AdmissionOutcome::Registered
        } else {
            info!(airline = %candidate, sponsor = %caller, "airline applied, pending votes");
            AdmissionOutcome::Applied
        };

        let status = match outcome {
            AdmissionOutcome::Registered => AirlineStatus::Registered,
            AdmissionOutcome::Applied => AirlineStatus::Applied,
        };
        self.airlines
            .insert(candidate.clone(), AirlineRecord::new(candidate, status, now));

        Ok(outcome)
    }

    /// Vote for an `Applied` candidate. Promotes once distinct votes
    /// strictly exceed half the registered total.
    pub fn vote(&mut self, candidate: &AccountId, caller: &AccountId) -> SuretyResult<VoteOutcome> {
        self.ensure_voter(caller, "vote for an airline")?;

        let registered_count = self.registered_count;
        let record = self
            .airlines
            .get_mut(candidate)
            .ok_or_else(|| SuretyError::UnknownAirline {
                airline: candidate.clone(),
            })?;

        if !record.votes.insert(caller.clone()) {
            return Err(SuretyError::DuplicateVote {
                candidate: candidate.clone(),
                voter: caller.clone(),
            });
        }

        let votes = record.votes.len();
        debug!(candidate = %candidate, voter = %caller, votes, "vote recorded");

        if record.status == AirlineStatus::Applied && votes * 2 > registered_count {
            record.status = AirlineStatus::Registered;
            self.registered_count += 1;
            info!(airline = %candidate, votes, registered_count, "airline promoted by majority");
            return Ok(VoteOutcome::Promoted { votes });
        }

        Ok(VoteOutcome::Recorded { votes })
    }

    /// Deposit the participation stake. Funding is monotonic: once funded,
    /// an airline never reverts.
    pub fn fund_airline(&mut self, caller: &AccountId, amount: Decimal) -> SuretyResult<()> {
        let record = self
            .airlines
            .get_mut(caller)
            .filter(|r| r.status.is_registered())
            .ok_or_else(|| SuretyError::Unauthorized {
                caller: caller.clone(),
                action: "fund an airline".to_string(),
            })?;

        if amount < self.funding_minimum {
            return Err(SuretyError::InsufficientFunds {
                required: self.funding_minimum,
                provided: amount,
            });
        }

        record.status = AirlineStatus::Funded;
        self.stake_total += amount;
        info!(airline = %caller, amount = %amount, "airline funded");
        Ok(())
    }

    /// True once an airline is admitted (`Registered` or `Funded`).
    /// `Applied` candidates are not yet airlines.
    pub fn is_airline(&self, id: &AccountId) -> bool {
        self.airlines
            .get(id)
            .map(|r| r.status.is_registered())
            .unwrap_or(false)
    }

    /// True once the participation stake is deposited.
    pub fn is_funded(&self, id: &AccountId) -> bool {
        self.airlines
            .get(id)
            .map(|r| r.status == AirlineStatus::Funded)
            .unwrap_or(false)
    }

    pub fn status_of(&self, id: &AccountId) -> Option<AirlineStatus> {
        self.airlines.get(id).map(|r| r.status)
    }

    pub fn registered_count(&self) -> usize {
        self.registered_count
    }

    pub fn airline_count(&self) -> usize {
        self.airlines.len()
    }

    pub fn stake_total(&self) -> Decimal {
        self.stake_total
    }

    fn ensure_voter(&self, caller: &AccountId, action: &str) -> SuretyResult<()> {
        if self.is_airline(caller) {
            Ok(())
        } else {
            Err(SuretyError::Unauthorized {
                caller: caller.clone(),
                action: action.to_string(),
            })
        }
    }
}
