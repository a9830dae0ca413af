//! Pluggable shard index sampling.
//!
//! The engine draws oracle index triples and request indexes through this
//! trait so production can use entropy while tests inject deterministic
//! sequences.

use crate::types::{IndexTriple, OracleIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of shard indexes in `0..space`.
pub trait IndexSampler {
    fn next_index(&mut self, space: u8) -> OracleIndex;

    /// Draw the triple assigned at oracle registration. Collisions within a
    /// triple are tolerated; indexes are opaque, not unique.
    fn next_triple(&mut self, space: u8) -> IndexTriple {
        IndexTriple::new(
            self.next_index(space),
            self.next_index(space),
            self.next_index(space),
        )
    }
}

/// Entropy-backed sampler for production use.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded variant for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSampler for RandomSampler {
    fn next_index(&mut self, space: u8) -> OracleIndex {
        OracleIndex(self.rng.gen_range(0..space))
    }
}

/// Replays a fixed sequence, cycling when exhausted. Test-oriented.
pub struct SequenceSampler {
    sequence: Vec<u8>,
    position: usize,
}

impl SequenceSampler {
    pub fn new(sequence: Vec<u8>) -> Self {
        assert!(!sequence.is_empty(), "sequence sampler needs at least one value");
        Self {
            sequence,
            position: 0,
        }
    }
}

impl IndexSampler for SequenceSampler {
    fn next_index(&mut self, space: u8) -> OracleIndex {
        let value = self.sequence[self.position % self.sequence.len()] % space;
        self.position += 1;
        OracleIndex(value)
    }
}
