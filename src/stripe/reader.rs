//! Windowed stripe reading over the input stream
//!
//! Pulls successive `K * block_size` windows from a buffered reader. The
//! final short window is zero-padded to the full stripe size; after it has
//! been delivered no further stripes are produced.

use std::io::Read;

use crate::error::Result;

/// One windowed slice of the input, padded to exactly `K * block_size` bytes
#[derive(Debug)]
pub struct Stripe {
    /// Zero-based stripe sequence index
    pub index: u64,

    /// Stripe payload, zero-padded in the trailing region if short
    pub data: Vec<u8>,

    /// Bytes actually read from the input (<= data.len())
    pub payload_len: usize,

    /// True for the last stripe of the input
    pub is_final: bool,
}

impl Stripe {
    /// Bytes of trailing zero padding in this stripe
    pub fn padding_len(&self) -> usize {
        self.data.len() - self.payload_len
    }
}

/// Reads fixed-size stripe windows from an input stream
pub struct StripeReader<R: Read> {
    inner: R,
    stripe_size: usize,
    next_index: u64,
    finished: bool,
}

impl<R: Read> StripeReader<R> {
    /// Create a reader producing windows of `stripe_size` bytes
    pub fn new(inner: R, stripe_size: usize) -> Self {
        StripeReader {
            inner,
            stripe_size,
            next_index: 0,
            finished: false,
        }
    }

    /// Pull the next stripe, or `None` once the input is exhausted
    ///
    /// A short read at end-of-input yields a final zero-padded stripe; an
    /// empty read yields `None`. Read faults other than end-of-stream
    /// propagate as `Error::Io`.
    pub fn next_stripe(&mut self) -> Option<Result<Stripe>> {
        if self.finished {
            return None;
        }

        let mut data = vec![0u8; self.stripe_size];
        let mut filled = 0;

        // Loop until the window is full or the stream ends; a single read
        // may legally return fewer bytes than requested mid-stream.
        while filled < self.stripe_size {
            match self.inner.read(&mut data[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }

        if filled == 0 {
            self.finished = true;
            return None;
        }

        let is_final = filled < self.stripe_size;
        if is_final {
            self.finished = true;
        }

        let stripe = Stripe {
            index: self.next_index,
            data,
            payload_len: filled,
            is_final,
        };
        self.next_index += 1;

        Some(Ok(stripe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8], stripe_size: usize) -> Vec<Stripe> {
        let mut reader = StripeReader::new(Cursor::new(input.to_vec()), stripe_size);
        let mut stripes = Vec::new();
        while let Some(stripe) = reader.next_stripe() {
            stripes.push(stripe.unwrap());
        }
        stripes
    }

    #[test]
    fn test_exact_multiple_input() {
        let input: Vec<u8> = (0..8192).map(|i| (i % 256) as u8).collect();
        let stripes = collect(&input, 4096);

        assert_eq!(stripes.len(), 2);
        assert_eq!(stripes[0].index, 0);
        assert_eq!(stripes[1].index, 1);
        assert_eq!(stripes[0].payload_len, 4096);
        assert_eq!(stripes[1].payload_len, 4096);
        assert_eq!(stripes[0].data, input[..4096]);
        assert_eq!(stripes[1].data, input[4096..]);

        // Even a full final stripe is flagged final only if the reader saw
        // the end of input; here stripe 1 filled completely, so the reader
        // discovers EOF on the following pull.
        assert!(!stripes[0].is_final);
        assert!(!stripes[1].is_final);
    }

    #[test]
    fn test_short_final_stripe_is_zero_padded() {
        let input = vec![0xABu8; 10_000];
        let stripes = collect(&input, 4096);

        assert_eq!(stripes.len(), 3);
        assert!(stripes[2].is_final);
        assert_eq!(stripes[2].payload_len, 10_000 - 2 * 4096);
        assert_eq!(stripes[2].padding_len(), 2288);

        // Trailing region is deterministic zero fill
        assert!(stripes[2].data[stripes[2].payload_len..]
            .iter()
            .all(|&b| b == 0));
        // Payload region is intact
        assert!(stripes[2].data[..stripes[2].payload_len]
            .iter()
            .all(|&b| b == 0xAB));
    }

    #[test]
    fn test_empty_input_yields_no_stripes() {
        let stripes = collect(&[], 4096);
        assert!(stripes.is_empty());
    }

    #[test]
    fn test_input_smaller_than_one_stripe() {
        let stripes = collect(&[1, 2, 3], 4096);
        assert_eq!(stripes.len(), 1);
        assert!(stripes[0].is_final);
        assert_eq!(stripes[0].payload_len, 3);
        assert_eq!(&stripes[0].data[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_no_stripes_after_final() {
        let mut reader = StripeReader::new(Cursor::new(vec![0u8; 10]), 4096);
        assert!(reader.next_stripe().is_some());
        assert!(reader.next_stripe().is_none());
        assert!(reader.next_stripe().is_none());
    }

    #[test]
    fn test_read_fault_propagates() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"))
            }
        }

        let mut reader = StripeReader::new(FailingReader, 4096);
        let result = reader.next_stripe().unwrap();
        assert!(result.is_err());
        assert!(reader.next_stripe().is_none());
    }
}
