//! telemetry/counters.rs
//! Plain counters collected while encoding and decoding packages.
//!
//! Workers keep their own counters and the caller merges them, so nothing
//! here needs locks or atomics.

use std::ops::AddAssign;

use bincode::{Decode, Encode};

#[derive(Default, Clone, Debug, Encode, Decode, PartialEq, Eq)]
pub struct CodecCounters {
    pub packages: u64,
    pub tokens: u64,
    pub payload_values: u64,
    /// Static dictionary code size of the tokens, in bytes.
    pub bytes_tokens_raw: u64,
    pub bytes_tokens_compressed: u64,
    pub bytes_payload_frame: u64,
    pub bytes_wrapper: u64,
}

impl CodecCounters {
    /// Record one assembled payload.
    pub fn add_payload(
        &mut self,
        tokens: usize,
        payload_values: usize,
        raw_bits: u64,
        compressed: usize,
        frame_len: usize,
    ) {
        self.packages += 1;
        self.tokens += tokens as u64;
        self.payload_values += payload_values as u64;
        self.bytes_tokens_raw += raw_bits.div_ceil(8);
        self.bytes_tokens_compressed += compressed as u64;
        self.bytes_payload_frame += frame_len as u64;
    }

    pub fn add_wrapper(&mut self, wrapper_len: usize) {
        self.bytes_wrapper += wrapper_len as u64;
    }

    /// Compressed over static-code token size; 0 when nothing was recorded.
    pub fn token_ratio(&self) -> f64 {
        if self.bytes_tokens_raw == 0 {
            return 0.0;
        }
        self.bytes_tokens_compressed as f64 / self.bytes_tokens_raw as f64
    }

    pub fn merge(&mut self, other: &CodecCounters) {
        self.packages += other.packages;
        self.tokens += other.tokens;
        self.payload_values += other.payload_values;
        self.bytes_tokens_raw += other.bytes_tokens_raw;
        self.bytes_tokens_compressed += other.bytes_tokens_compressed;
        self.bytes_payload_frame += other.bytes_payload_frame;
        self.bytes_wrapper += other.bytes_wrapper;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let (counters, _) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(counters)
    }
}

impl AddAssign for CodecCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
