//! Distribution ledger: the record that makes the scatter reversible
//!
//! One placement permutation per stripe, in strict stripe-index order with
//! no gaps. Losing this record permanently strands the shard files: they
//! stay byte-valid but their logical-to-physical mapping is unknown. The
//! orchestrator therefore persists the ledger (inside the manifest) before
//! the run is reported successful.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::placement::PlacementPermutation;

/// Ordered record of every stripe's placement permutation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionLedger {
    entries: Vec<PlacementPermutation>,
}

impl DistributionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        DistributionLedger::default()
    }

    /// Record the permutation chosen for `stripe_index`
    ///
    /// Entries must arrive in increasing stripe order with no gaps; exactly
    /// one entry per stripe.
    pub fn record(&mut self, stripe_index: u64, permutation: PlacementPermutation) -> Result<()> {
        let expected = self.entries.len() as u64;
        if stripe_index != expected {
            return Err(Error::LedgerOutOfOrder {
                expected,
                got: stripe_index,
            });
        }
        self.entries.push(permutation);
        Ok(())
    }

    /// Look up the permutation recorded for `stripe_index`
    pub fn permutation_for(&self, stripe_index: u64) -> Result<&PlacementPermutation> {
        self.entries
            .get(stripe_index as usize)
            .ok_or(Error::MissingLedgerEntry(stripe_index))
    }

    /// Number of stripes recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before any stripe has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in stripe order
    pub fn iter(&self) -> impl Iterator<Item = &PlacementPermutation> {
        self.entries.iter()
    }
}
