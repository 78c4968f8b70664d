//! Whole-file and per-shard integrity hashing
//!
//! The whole-file digest is computed in a single streaming pass before
//! striping begins, over its own file handle. It is reporting/verification
//! metadata only; it never gates the encode run.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Read buffer size for the streaming digest pass
const HASH_BUF_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 digest of an entire file, as a hex string
pub fn file_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; HASH_BUF_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Compute the BLAKE3 digest of a single shard, as a hex string
pub fn shard_digest(shard: &[u8]) -> String {
    blake3::hash(shard).to_hex().to_string()
}
