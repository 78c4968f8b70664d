//! Per-stripe shard placement shuffling
//!
//! Each stripe gets its own pseudo-random permutation mapping logical shard
//! index (data vs. parity slot) to physical destination file index. The
//! shuffler owns an explicit generator rather than touching global random
//! state, so tests can inject a fixed seed and a run-level seed can be
//! recorded in the manifest.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A bijection from logical shard index to physical destination index
///
/// Must cover `[0, n)` with no repeats or omissions, or the stripe becomes
/// impossible to reassemble. Deserialization goes through the same
/// bijectivity check as `from_mapping`, so a corrupted ledger entry is a
/// hard failure rather than a silently wrong mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>")]
pub struct PlacementPermutation(Vec<usize>);

impl TryFrom<Vec<usize>> for PlacementPermutation {
    type Error = Error;

    fn try_from(mapping: Vec<usize>) -> Result<Self> {
        PlacementPermutation::from_mapping(mapping)
    }
}

impl PlacementPermutation {
    /// Build a permutation from an explicit mapping, checking bijectivity
    pub fn from_mapping(mapping: Vec<usize>) -> Result<Self> {
        let n = mapping.len();
        let mut seen = vec![false; n];
        for &dest in &mapping {
            if dest >= n || seen[dest] {
                return Err(Error::InvalidPlacement(format!(
                    "mapping {:?} is not a permutation of [0, {})",
                    mapping, n
                )));
            }
            seen[dest] = true;
        }
        Ok(PlacementPermutation(mapping))
    }

    /// The identity placement (logical index == physical index)
    pub fn identity(n: usize) -> Self {
        PlacementPermutation((0..n).collect())
    }

    /// Physical destination index for logical shard `i`
    pub fn destination_of(&self, logical: usize) -> usize {
        self.0[logical]
    }

    /// Number of shard slots covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-slot permutation
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The inverse mapping: physical destination index -> logical shard index
    ///
    /// This is what a decoder applies to put scattered shards back into
    /// codec order.
    pub fn invert(&self) -> PlacementPermutation {
        let mut inverse = vec![0usize; self.0.len()];
        for (logical, &physical) in self.0.iter().enumerate() {
            inverse[physical] = logical;
        }
        PlacementPermutation(inverse)
    }

    /// The raw logical -> physical mapping
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Produces a fresh placement permutation per stripe
pub struct PlacementShuffler {
    rng: StdRng,
    seed: u64,
}

impl PlacementShuffler {
    /// Create a shuffler with a random run-level seed
    pub fn new() -> Self {
        let seed = rand::rngs::OsRng.next_u64();
        Self::with_seed(seed)
    }

    /// Create a shuffler from an explicit seed
    ///
    /// The same seed replays the same sequence of permutations, which makes
    /// placement re-derivable from the manifest and tests deterministic.
    pub fn with_seed(seed: u64) -> Self {
        PlacementShuffler {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The run-level seed this shuffler was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce a uniform random permutation of `[0, n)`
    ///
    /// `n = 0` and `n = 1` yield the trivial permutation.
    pub fn permute(&mut self, n: usize) -> PlacementPermutation {
        let mut mapping: Vec<usize> = (0..n).collect();
        mapping.shuffle(&mut self.rng);
        PlacementPermutation(mapping)
    }
}

impl Default for PlacementShuffler {
    fn default() -> Self {
        Self::new()
    }
}
