//! Flight registry.
//!
//! Flights are keyed by (airline, code, departure slot) and owned by funded
//! airlines. A record is immutable once registered except for its status,
//! which only the oracle engine's resolution cascade sets.

use crate::error::{SuretyError, SuretyResult};
use crate::types::{AccountId, FlightKey, FlightRecord, FlightStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::info;

/// Keyed store of registered flights.
#[derive(Debug, Default)]
pub struct FlightRegistry {
    flights: HashMap<FlightKey, FlightRecord>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flight. The caller must be the owning airline; the funded
    /// check is enforced by the facade against the airline registry.
    pub fn register_flight(
        &mut self,
        key: FlightKey,
        caller: &AccountId,
        now: DateTime<Utc>,
    ) -> SuretyResult<()> {
        if caller != &key.airline {
            return Err(SuretyError::Unauthorized {
                caller: caller.clone(),
                action: format!("register flight {} for another airline", key),
            });
        }
        if self.flights.contains_key(&key) {
            return Err(SuretyError::DuplicateFlight {
                flight: key.to_string(),
            });
        }
        info!(flight = %key, "flight registered");
        self.flights.insert(key.clone(), FlightRecord::new(key, now));
        Ok(())
    }

    /// Overwrite the flight status. Invoked only from the oracle engine's
    /// resolution cascade; idempotent when replayed with the same code.
    pub fn set_status(&mut self, key: &FlightKey, status: FlightStatus) -> SuretyResult<()> {
        let record = self
            .flights
            .get_mut(key)
            .ok_or_else(|| SuretyError::UnknownFlight {
                flight: key.to_string(),
            })?;
        record.status = status;
        info!(flight = %key, status = %status, "flight status set");
        Ok(())
    }

    pub fn is_registered(&self, key: &FlightKey) -> bool {
        self.flights.contains_key(key)
    }

    pub fn status_of(&self, key: &FlightKey) -> Option<FlightStatus> {
        self.flights.get(key).map(|r| r.status)
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }
}
