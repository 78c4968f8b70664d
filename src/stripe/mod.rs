//! Stripe pipeline: windowed reading, shard placement, and scattered writes
//!
//! A stripe is one fixed-size window of the input file, independently
//! erasure-coded into K data + M parity shards. Each stripe's shards are
//! scattered across the K+M destination files by a per-stripe placement
//! permutation; the distribution ledger records every permutation so the
//! scatter can be reversed.

pub mod ledger;
pub mod placement;
pub mod reader;
pub mod writer;

pub use ledger::DistributionLedger;
pub use placement::{PlacementPermutation, PlacementShuffler};
pub use reader::{Stripe, StripeReader};
pub use writer::ShardWriter;
