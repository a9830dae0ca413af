//! Surety Core - Flight-Delay Insurance Consensus and Accounting
//!
//! The rules layer of the surety network: airline admission governance,
//! flight registration, passenger insurance escrow, and a sharded oracle
//! network that resolves flight-status outcomes by per-code quorum. The
//! hosting ledger substrate supplies atomic call ordering, caller identity,
//! and monetary transfer; this crate specifies what each call is allowed to
//! do on top of that substrate.
//!
//! # Core Invariants
//!
//! | Invariant | Requirement |
//! |-----------|-------------|
//! | **Gate First** | Every mutating operation checks the operational gate before any state read |
//! | **Majority Admission** | Past the bootstrap phase, an airline is admitted only by strictly more than half of registered airlines |
//! | **Funding Monotonic** | A funded airline never reverts to unfunded |
//! | **Quorum Finality** | A request closes atomically with the first status code to reach quorum; no reopen, no re-vote |
//! | **Credit Once** | A policy is credited at most once, and only on a `LateAirline` outcome |
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              External collaborators (out of crate)           │
//! │     (ledger substrate, oracle polling agents, admin UI)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    SuretyApp facade (app.rs)                 │
//! │        gate-first checks, event log, resolution cascade      │
//! ├──────────────┬───────────────┬───────────────┬──────────────┤
//! │   Airline    │    Flight     │   Insurance   │    Oracle    │
//! │   Registry   │    Registry   │    Ledger     │   Consensus  │
//! │  (admission  │  (keyed by    │  (escrow +    │  (sharding + │
//! │   voting)    │   key triple) │   crediting)  │    quorum)   │
//! └──────────────┴───────────────┴───────────────┴──────────────┘
//! ```
//!
//! Control flow: a caller requests a status refresh, the engine opens a
//! request under one sampled shard index, registered oracles holding that
//! index answer asynchronously, and the first status code to collect a
//! quorum of distinct responses closes the request and cascades into the
//! flight registry (status write) and the insurance ledger (crediting).

pub mod app;
pub mod config;
pub mod error;
pub mod gate;
pub mod insurance;
pub mod oracle;
pub mod registry;
pub mod types;

// Re-export error types
pub use error::{SuretyError, SuretyResult};

// Re-export configuration
pub use config::SuretyConfig;

// Re-export the facade
pub use app::{SuretyApp, SuretyEvent, SuretyStats};

// Re-export components
pub use gate::OperationalGate;
pub use insurance::InsuranceLedger;
pub use oracle::{
    IndexSampler, OracleConsensusEngine, RandomSampler, ResponseOutcome, SequenceSampler,
};
pub use registry::{AdmissionOutcome, AirlineRegistry, FlightRegistry, VoteOutcome};

// Re-export the data model
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol version
pub const PROTOCOL_VERSION: &str = "v1";
