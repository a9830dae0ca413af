//! Flight identity and status outcomes.

use super::common::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flight code (e.g. "ND1309").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightCode(pub String);

impl FlightCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FlightCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite flight key: (airline, code, departure slot).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    pub airline: AccountId,
    pub code: FlightCode,
    pub departure: DateTime<Utc>,
}

impl FlightKey {
    pub fn new(airline: AccountId, code: FlightCode, departure: DateTime<Utc>) -> Self {
        Self {
            airline,
            code,
            departure,
        }
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}@{}",
            self.airline,
            self.code,
            self.departure.timestamp()
        )
    }
}

/// Flight delay outcome with its wire code.
///
/// Wire codes match the values external oracle agents report:
/// 0, 10, 20, 30, 40, 50.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    /// Wire code reported by oracle agents.
    pub fn code(&self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlightStatus::Unknown),
            10 => Some(FlightStatus::OnTime),
            20 => Some(FlightStatus::LateAirline),
            30 => Some(FlightStatus::LateWeather),
            40 => Some(FlightStatus::LateTechnical),
            50 => Some(FlightStatus::LateOther),
            _ => None,
        }
    }

    /// Whether this outcome entitles insured passengers to a credit.
    pub fn is_payable(&self) -> bool {
        matches!(self, FlightStatus::LateAirline)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlightStatus::Unknown => "Unknown",
            FlightStatus::OnTime => "OnTime",
            FlightStatus::LateAirline => "LateAirline",
            FlightStatus::LateWeather => "LateWeather",
            FlightStatus::LateTechnical => "LateTechnical",
            FlightStatus::LateOther => "LateOther",
        }
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flight record owned by the flight registry. Immutable once registered
/// except for `status`, which the oracle engine's resolution sets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlightRecord {
    pub key: FlightKey,
    pub status: FlightStatus,
    pub registered_at: DateTime<Utc>,
}

impl FlightRecord {
    pub fn new(key: FlightKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            status: FlightStatus::Unknown,
            registered_at: now,
        }
    }
}
