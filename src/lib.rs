//! stripecast - erasure-coded file striping with scattered placement
//!
//! This library stripes a single input file into fixed-size windows,
//! Reed-Solomon encodes each window into K data + M parity shards, and
//! scatters every stripe's shards across K+M numbered destination files
//! using a per-stripe placement permutation. The manifest it persists
//! (file digest, shard geometry, per-shard hashes, full placement ledger)
//! is what makes the scatter reversible.

pub mod codec;
pub mod config;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod stripe;

pub use config::EncodeConfig;
pub use encoder::{EncodeReport, FileEncoder};
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EncodeConfig;
    pub use crate::encoder::{EncodeReport, FileEncoder};
    pub use crate::error::{Error, Result};
    pub use crate::manifest::EncodeManifest;
}
