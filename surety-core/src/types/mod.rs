//! Core data model: identities, airline/flight/insurance records, and
//! oracle request state.

mod airline;
mod common;
mod flight;
mod insurance;
mod oracle;

pub use airline::{AirlineRecord, AirlineStatus};
pub use common::AccountId;
pub use flight::{FlightCode, FlightKey, FlightRecord, FlightStatus};
pub use insurance::InsurancePolicy;
pub use oracle::{IndexTriple, OracleIndex, OracleRecord, OracleRequest, RequestKey};
