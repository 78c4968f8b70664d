//! Encode orchestration
//!
//! Drives the pipeline: digest pass over the whole file, then one iteration
//! per stripe (read -> split -> encode -> permute -> write -> record), then
//! manifest persistence. The run is only reported successful after the
//! manifest holding the distribution ledger has been written; shards with no
//! persisted placement record are unrecoverable.
//!
//! Errors are fatal: there is no retry and no rollback, and a mid-run
//! failure can leave destination files truncated at different stripe counts.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::codec::RsCodec;
use crate::config::EncodeConfig;
use crate::error::{Error, Result};
use crate::hash;
use crate::manifest::{EncodeManifest, StripeRecord, MANIFEST_VERSION};
use crate::stripe::{DistributionLedger, PlacementShuffler, ShardWriter, StripeReader};

/// Summary of a completed encode run
#[derive(Debug)]
pub struct EncodeReport {
    /// Stripes processed
    pub stripe_count: u64,

    /// Original file size in bytes
    pub file_size: u64,

    /// BLAKE3 digest of the original file
    pub file_hash: String,

    /// Bytes written across all destinations (includes parity and padding)
    pub bytes_written: u64,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Where the manifest was persisted
    pub manifest_path: PathBuf,

    /// Destination file paths, indexed by physical index
    pub destination_paths: Vec<PathBuf>,
}

/// Encodes one file into scattered erasure-coded shard files
pub struct FileEncoder {
    config: EncodeConfig,
    placement_seed: Option<u64>,
    cancel: Arc<AtomicBool>,
}

impl FileEncoder {
    /// Create an encoder; the configuration is validated before any file is
    /// opened
    pub fn new(config: EncodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(FileEncoder {
            config,
            placement_seed: None,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Fix the placement seed (deterministic placement, e.g. for tests)
    pub fn with_placement_seed(mut self, seed: u64) -> Self {
        self.placement_seed = Some(seed);
        self
    }

    /// Flag checked once per stripe boundary; set it to abort the run
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the full encode pipeline over `input`
    pub fn run(&self, input: &Path) -> Result<EncodeReport> {
        let start = Instant::now();

        let file_size = std::fs::metadata(input)?.len();
        let expected_stripes = self.config.stripe_count(file_size);
        info!(
            "Encoding {:?}: {} bytes, K={}, M={}, block size {} ({} stripes expected)",
            input,
            file_size,
            self.config.data_shards,
            self.config.parity_shards,
            self.config.block_size,
            expected_stripes
        );

        // Digest pass over its own scoped handle, before striping begins
        let file_hash = hash::file_digest(input)?;
        debug!("File digest: {}", file_hash);

        let codec = RsCodec::new(self.config.data_shards, self.config.parity_shards)?;
        let mut shuffler = match self.placement_seed {
            Some(seed) => PlacementShuffler::with_seed(seed),
            None => PlacementShuffler::new(),
        };

        // Stripe pass over a second, independent handle
        let mut reader = StripeReader::new(
            BufReader::new(File::open(input)?),
            self.config.stripe_size(),
        );
        let mut writer = ShardWriter::create(
            input,
            self.config.output_dir.as_deref(),
            self.config.total_shards(),
        )?;

        let mut ledger = DistributionLedger::new();
        let mut records = Vec::with_capacity(expected_stripes as usize);
        let mut bytes_written = 0u64;

        while let Some(stripe) = reader.next_stripe() {
            if self.cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled {
                    stripes_completed: ledger.len() as u64,
                });
            }

            let stripe = stripe?;

            let mut shards = codec.split(&stripe.data)?;
            codec.encode(&mut shards)?;

            let permutation = shuffler.permute(self.config.total_shards());
            let shard_hashes = shards.iter().map(|s| hash::shard_digest(s)).collect();

            writer.write_stripe(&shards, &permutation)?;
            bytes_written += shards.iter().map(|s| s.len() as u64).sum::<u64>();

            ledger.record(stripe.index, permutation.clone())?;
            records.push(StripeRecord {
                index: stripe.index,
                placement: permutation,
                shard_hashes,
            });

            debug!(
                "Stripe {}: {} payload bytes, {} padding, final={}",
                stripe.index,
                stripe.payload_len,
                stripe.padding_len(),
                stripe.is_final
            );
        }

        writer.finish()?;

        let file_name = input
            .file_name()
            .ok_or_else(|| Error::InvalidInputPath(input.to_path_buf()))?
            .to_string_lossy()
            .into_owned();

        let manifest = EncodeManifest {
            version: MANIFEST_VERSION,
            file_name: file_name.clone(),
            file_size,
            file_hash: file_hash.clone(),
            data_shards: self.config.data_shards,
            parity_shards: self.config.parity_shards,
            block_size: self.config.block_size,
            placement_seed: shuffler.seed(),
            stripes: records,
        };

        let manifest_dir = match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => input.parent().unwrap_or(Path::new(".")).to_path_buf(),
        };
        let manifest_path = EncodeManifest::path_for(&file_name, &manifest_dir);
        // The run only counts as successful once the ledger is durable
        manifest.save(&manifest_path)?;

        let duration = start.elapsed();
        info!(
            "Encoded {} stripes into {} destinations in {:?}",
            ledger.len(),
            self.config.total_shards(),
            duration
        );

        Ok(EncodeReport {
            stripe_count: ledger.len() as u64,
            file_size,
            file_hash,
            bytes_written,
            duration,
            manifest_path,
            destination_paths: writer.destination_paths().to_vec(),
        })
    }
}
