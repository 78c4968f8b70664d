//! Error types for stripecast

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for stripecast
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input path {0:?} has no file name")]
    InvalidInputPath(PathBuf),

    // Codec errors
    #[error("Codec split failed: {0}")]
    CodecSplit(String),

    #[error("Codec encode failed: {0}")]
    CodecEncode(String),

    #[error("Codec reconstruct failed: {0}")]
    CodecReconstruct(String),

    // Placement errors
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    // Ledger errors
    #[error("Ledger entry out of order: expected stripe {expected}, got {got}")]
    LedgerOutOfOrder { expected: u64, got: u64 },

    #[error("No ledger entry for stripe {0}")]
    MissingLedgerEntry(u64),

    // Manifest errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Run control
    #[error("Encode cancelled after {stripes_completed} stripes")]
    Cancelled { stripes_completed: u64 },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
