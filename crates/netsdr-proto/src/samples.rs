//! I/Q sample decoder.
//!
//! Data-item frame bodies carry raw digitizer samples packed back-to-back
//! at the bit width the receiver was configured for (8, 16, 24, or 32
//! bits). This module unpacks such a payload into 32-bit integers.
//!
//! Samples are widened **without sign interpretation**: the little-endian
//! sample bytes are copied into the low-order bytes of a `u32` and the
//! remainder is zero-filled. This matches the observed device contract;
//! samples here are treated as unsigned magnitude.

use netsdr_core::{Error, Result};

/// Lazy iterator over the samples packed in one payload.
///
/// The sequence is finite and not restartable; call
/// [`decode_samples`] again for a fresh pass over the payload.
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    payload: &'a [u8],
    bytes_per_sample: usize,
    pos: usize,
}

impl Iterator for Samples<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        // Trailing bytes that do not fill a whole sample are dropped.
        if self.pos + self.bytes_per_sample > self.payload.len() {
            return None;
        }

        let mut bytes = [0u8; 4];
        bytes[..self.bytes_per_sample]
            .copy_from_slice(&self.payload[self.pos..self.pos + self.bytes_per_sample]);
        self.pos += self.bytes_per_sample;

        Some(u32::from_le_bytes(bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.payload.len() - self.pos) / self.bytes_per_sample;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// Decode a payload into samples of the given bit width.
///
/// `sample_bits` must be one of 8, 16, 24, or 32. The payload is not
/// copied; the returned iterator yields `floor(payload.len() / width)`
/// samples lazily, each zero-extended to 32 bits.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for any other bit width, before
/// any sample is produced.
pub fn decode_samples(sample_bits: u16, payload: &[u8]) -> Result<Samples<'_>> {
    match sample_bits {
        8 | 16 | 24 | 32 => Ok(Samples {
            payload,
            bytes_per_sample: sample_bits as usize / 8,
            pos: 0,
        }),
        other => Err(Error::InvalidParameter(format!(
            "sample size must be 8, 16, 24, or 32 bits, got {}",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
