//! Reed-Solomon codec adapter
//!
//! Wraps the Galois-field encode/reconstruct primitive behind the two
//! operations the striping pipeline consumes: `split` a stripe buffer into
//! K data shards plus M empty parity slots, and `encode` to fill the parity
//! in place. Any K of the K+M shards can reconstruct the stripe.

use reed_solomon_erasure::galois_8::ReedSolomon;

use crate::error::{Error, Result};

/// Reed-Solomon encoder for one (K, M) shard geometry
pub struct RsCodec {
    /// None when M = 0: the RS crate requires at least one parity shard,
    /// and a parity-free stripe has nothing to encode anyway.
    rs: Option<ReedSolomon>,
    data_shards: usize,   // K
    parity_shards: usize, // M
}

impl RsCodec {
    /// Create a codec for K data shards and M parity shards
    ///
    /// # Errors
    /// Returns `InvalidConfig` if K is 0 or K + M exceeds the GF(2^8) limit.
    pub fn new(data_shards: usize, parity_shards: usize) -> Result<Self> {
        if data_shards == 0 {
            return Err(Error::InvalidConfig(
                "data_shards must be greater than 0".to_string(),
            ));
        }
        if data_shards + parity_shards > crate::config::MAX_TOTAL_SHARDS {
            return Err(Error::InvalidConfig(format!(
                "total shards must not exceed {}",
                crate::config::MAX_TOTAL_SHARDS
            )));
        }

        let rs = if parity_shards > 0 {
            Some(
                ReedSolomon::new(data_shards, parity_shards).map_err(|e| {
                    Error::InvalidConfig(format!("failed to create Reed-Solomon codec: {}", e))
                })?,
            )
        } else {
            None
        };

        Ok(Self {
            rs,
            data_shards,
            parity_shards,
        })
    }

    /// Split a stripe buffer into K equal data shards plus M zeroed parity slots
    ///
    /// Precondition: `buffer.len()` is an exact multiple of K (the stripe
    /// reader always delivers `K * block_size` bytes).
    pub fn split(&self, buffer: &[u8]) -> Result<Vec<Vec<u8>>> {
        if buffer.is_empty() || buffer.len() % self.data_shards != 0 {
            return Err(Error::CodecSplit(format!(
                "buffer length {} is not a positive multiple of {} data shards",
                buffer.len(),
                self.data_shards
            )));
        }

        let shard_size = buffer.len() / self.data_shards;
        let mut shards: Vec<Vec<u8>> = buffer
            .chunks(shard_size)
            .map(|chunk| chunk.to_vec())
            .collect();

        for _ in 0..self.parity_shards {
            shards.push(vec![0u8; shard_size]);
        }

        Ok(shards)
    }

    /// Fill the parity shards in place
    ///
    /// Expects exactly the K+M shards produced by `split`. A no-op when M = 0.
    pub fn encode(&self, shards: &mut [Vec<u8>]) -> Result<()> {
        if shards.len() != self.total_shards() {
            return Err(Error::CodecEncode(format!(
                "expected {} shards, got {}",
                self.total_shards(),
                shards.len()
            )));
        }

        if let Some(rs) = &self.rs {
            rs.encode(shards)
                .map_err(|e| Error::CodecEncode(e.to_string()))?;
        }

        Ok(())
    }

    /// Reconstruct missing shards from any K survivors
    ///
    /// `shards` holds `None` for missing entries; reconstructed shards are
    /// filled in place.
    pub fn reconstruct(&self, shards: &mut [Option<Vec<u8>>]) -> Result<()> {
        if shards.len() != self.total_shards() {
            return Err(Error::CodecReconstruct(format!(
                "expected {} shards, got {}",
                self.total_shards(),
                shards.len()
            )));
        }

        let available = shards.iter().filter(|s| s.is_some()).count();
        if available < self.data_shards {
            return Err(Error::CodecReconstruct(format!(
                "not enough shards: need {}, have {}",
                self.data_shards, available
            )));
        }

        match &self.rs {
            Some(rs) => rs
                .reconstruct(shards)
                .map_err(|e| Error::CodecReconstruct(e.to_string())),
            None => {
                // M = 0: every data shard must already be present
                if available == self.data_shards {
                    Ok(())
                } else {
                    Err(Error::CodecReconstruct(
                        "parity-free stripe is missing data shards".to_string(),
                    ))
                }
            }
        }
    }

    /// Get K (data shards)
    pub fn data_shards(&self) -> usize {
        self.data_shards
    }

    /// Get K + M (total shards)
    pub fn total_shards(&self) -> usize {
        self.data_shards + self.parity_shards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_creation() {
        assert!(RsCodec::new(4, 2).is_ok());
        assert!(RsCodec::new(1, 1).is_ok());
        assert!(RsCodec::new(4, 0).is_ok()); // parity-free

        assert!(RsCodec::new(0, 2).is_err()); // K = 0
        assert!(RsCodec::new(255, 2).is_err()); // K + M > 256
    }

    #[test]
    fn test_split_shapes() {
        let codec = RsCodec::new(4, 2).unwrap();
        let buffer = vec![7u8; 4096];

        let shards = codec.split(&buffer).unwrap();
        assert_eq!(shards.len(), 6);
        for shard in &shards {
            assert_eq!(shard.len(), 1024);
        }

        // Data shards are direct slices, parity slots are zeroed
        assert_eq!(shards[0], vec![7u8; 1024]);
        assert_eq!(shards[4], vec![0u8; 1024]);
        assert_eq!(shards[5], vec![0u8; 1024]);
    }

    #[test]
    fn test_split_rejects_bad_lengths() {
        let codec = RsCodec::new(4, 2).unwrap();
        assert!(codec.split(&[]).is_err());
        assert!(codec.split(&[0u8; 4097]).is_err());
    }

    #[test]
    fn test_encode_then_reconstruct() {
        let codec = RsCodec::new(4, 2).unwrap();
        let buffer: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();

        let mut shards = codec.split(&buffer).unwrap();
        codec.encode(&mut shards).unwrap();

        // Drop two shards (one data, one parity) and reconstruct
        let mut partial: Vec<Option<Vec<u8>>> =
            shards.iter().map(|s| Some(s.clone())).collect();
        partial[1] = None;
        partial[5] = None;

        codec.reconstruct(&mut partial).unwrap();

        let restored: Vec<u8> = partial
            .iter()
            .take(4)
            .flat_map(|s| s.as_ref().unwrap().clone())
            .collect();
        assert_eq!(restored, buffer);
    }

    #[test]
    fn test_reconstruct_needs_k_shards() {
        let codec = RsCodec::new(4, 2).unwrap();
        let mut shards = codec.split(&vec![1u8; 4096]).unwrap();
        codec.encode(&mut shards).unwrap();

        // Only 3 of 6 survive (need K = 4)
        let mut partial: Vec<Option<Vec<u8>>> =
            shards.into_iter().map(Some).collect();
        partial[0] = None;
        partial[2] = None;
        partial[4] = None;

        assert!(codec.reconstruct(&mut partial).is_err());
    }

    #[test]
    fn test_encode_shard_count_mismatch() {
        let codec = RsCodec::new(4, 2).unwrap();
        let mut shards = vec![vec![0u8; 16]; 5];
        assert!(codec.encode(&mut shards).is_err());
    }

    #[test]
    fn test_parity_free_encode_is_noop() {
        let codec = RsCodec::new(4, 0).unwrap();
        let buffer = vec![3u8; 64];

        let mut shards = codec.split(&buffer).unwrap();
        assert_eq!(shards.len(), 4);

        let before = shards.clone();
        codec.encode(&mut shards).unwrap();
        assert_eq!(shards, before);
    }
}
