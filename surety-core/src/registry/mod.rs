//! Airline and flight registries.

mod airline;
mod flight;

pub use airline::{AdmissionOutcome, AirlineRegistry, VoteOutcome};
pub use flight::FlightRegistry;
