//! Encode manifest: the persisted metadata artifact
//!
//! Captures everything reconstruction needs: original file size and digest,
//! shard geometry, the placement seed, and one record per stripe holding the
//! placement permutation plus a per-shard content hash. Without this file
//! the shard files stay byte-valid but cannot be reassembled.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stripe::ledger::DistributionLedger;
use crate::stripe::placement::PlacementPermutation;

/// Current manifest schema version
pub const MANIFEST_VERSION: u32 = 1;

/// Per-stripe record: where each shard went and what it hashed to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeRecord {
    /// Zero-based stripe index
    pub index: u64,

    /// Logical shard index -> physical destination index
    pub placement: PlacementPermutation,

    /// BLAKE3 digest of each logical shard (data shards first, then parity)
    pub shard_hashes: Vec<String>,
}

/// Manifest describing one complete encode run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeManifest {
    /// Manifest schema version
    pub version: u32,

    /// Original file name (no directory)
    pub file_name: String,

    /// Original file size in bytes
    pub file_size: u64,

    /// BLAKE3 digest of the complete original file
    pub file_hash: String,

    /// Number of data shards per stripe (K)
    pub data_shards: usize,

    /// Number of parity shards per stripe (M)
    pub parity_shards: usize,

    /// Size of each shard in bytes
    pub block_size: usize,

    /// Run-level seed the placement shuffler was built from
    pub placement_seed: u64,

    /// One record per stripe, in stripe order
    pub stripes: Vec<StripeRecord>,
}

impl EncodeManifest {
    /// Number of stripes recorded
    pub fn stripe_count(&self) -> u64 {
        self.stripes.len() as u64
    }

    /// Total shards per stripe (K + M)
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Rebuild the distribution ledger from the stripe records
    pub fn ledger(&self) -> Result<DistributionLedger> {
        let mut ledger = DistributionLedger::new();
        for record in &self.stripes {
            ledger.record(record.index, record.placement.clone())?;
        }
        Ok(ledger)
    }

    /// Manifest path convention: `<originalName>.manifest.json` in `dir`
    pub fn path_for(file_name: &str, dir: &Path) -> PathBuf {
        dir.join(format!("{}.manifest.json", file_name))
    }

    /// Write the manifest as pretty JSON
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash mid-write never leaves a truncated manifest under the final name.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Load a manifest from disk, checking the schema version
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let manifest: EncodeManifest = serde_json::from_str(&content)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(Error::Manifest(format!(
                "unsupported manifest version {} (expected {})",
                manifest.version, MANIFEST_VERSION
            )));
        }
        Ok(manifest)
    }
}
