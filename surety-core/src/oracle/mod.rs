//! Oracle consensus: registration, index sharding, and quorum resolution.

mod engine;
mod sampler;

pub use engine::{OracleConsensusEngine, ResponseOutcome};
pub use sampler::{IndexSampler, RandomSampler, SequenceSampler};
