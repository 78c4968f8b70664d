//! Encode run configuration
//!
//! Defines the Reed-Solomon striping parameters for one encoding run:
//! - `data_shards` (K): number of data shards per stripe
//! - `parity_shards` (M): number of parity shards per stripe
//! - `block_size`: bytes per shard
//!
//! K + M destination files are produced; any K shards per stripe can
//! reconstruct that stripe.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of data shards (K)
pub const DEFAULT_DATA_SHARDS: usize = 4;

/// Default number of parity shards (M)
pub const DEFAULT_PARITY_SHARDS: usize = 2;

/// Default shard block size in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// The GF(2^8) codec supports at most 256 shards per stripe
pub const MAX_TOTAL_SHARDS: usize = 256;

/// Configuration for one encoding run
///
/// Fixed for the lifetime of a run. Must be validated before any file
/// is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// Number of data shards per stripe (K)
    pub data_shards: usize,

    /// Number of parity shards per stripe (M)
    pub parity_shards: usize,

    /// Size of each shard in bytes
    pub block_size: usize,

    /// Output directory override; shards land next to the input when unset
    pub output_dir: Option<PathBuf>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        EncodeConfig {
            data_shards: DEFAULT_DATA_SHARDS,
            parity_shards: DEFAULT_PARITY_SHARDS,
            block_size: DEFAULT_BLOCK_SIZE,
            output_dir: None,
        }
    }
}

impl EncodeConfig {
    /// Create a config with custom K, M and block size
    pub fn new(data_shards: usize, parity_shards: usize, block_size: usize) -> Self {
        EncodeConfig {
            data_shards,
            parity_shards,
            block_size,
            output_dir: None,
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    /// Validate the configuration
    ///
    /// # Validation Rules
    /// - K (data_shards) must be >= 1
    /// - K + M must not exceed 256 (GF(2^8) codec limit)
    /// - block_size must be >= 1
    pub fn validate(&self) -> Result<()> {
        if self.data_shards < 1 {
            return Err(Error::InvalidConfig(
                "data_shards (K) must be at least 1".to_string(),
            ));
        }

        if self.total_shards() > MAX_TOTAL_SHARDS {
            return Err(Error::InvalidConfig(format!(
                "sum of data and parity shards ({}) cannot exceed {}",
                self.total_shards(),
                MAX_TOTAL_SHARDS
            )));
        }

        if self.block_size < 1 {
            return Err(Error::InvalidConfig(
                "block_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Total shards per stripe (K + M)
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }

    /// Bytes consumed from the input per stripe (K * block_size)
    pub fn stripe_size(&self) -> usize {
        self.data_shards * self.block_size
    }

    /// Number of shard losses per stripe that remain survivable
    pub fn fault_tolerance(&self) -> usize {
        self.parity_shards
    }

    /// Total stripes needed to cover `file_size` bytes
    pub fn stripe_count(&self, file_size: u64) -> u64 {
        let stripe_size = self.stripe_size() as u64;
        file_size.div_ceil(stripe_size)
    }
}
