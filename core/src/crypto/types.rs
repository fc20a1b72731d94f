//! crypto/types.rs
//! Envelope algorithm identifiers, KDF parameters and errors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    KDF_HASH_LEN, KDF_MAX_MEMORY_COST, KDF_MAX_PARALLELISM, KDF_MAX_TIME_COST, KDF_MEMORY_COST,
    KDF_PARALLELISM, KDF_TIME_COST, KEY_LEN,
};

pub const KDF_ARGON2ID: &str = "argon2id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AeadAlgorithm {
    #[serde(rename = "chacha20poly1305")]
    ChaCha20Poly1305,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl AeadAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            AeadAlgorithm::ChaCha20Poly1305 => "chacha20poly1305",
            AeadAlgorithm::Aes256Gcm => "aes-256-gcm",
        }
    }
}

impl Default for AeadAlgorithm {
    fn default() -> Self {
        AeadAlgorithm::ChaCha20Poly1305
    }
}

impl FromStr for AeadAlgorithm {
    type Err = CryptoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chacha20poly1305" | "chacha20-poly1305" => Ok(AeadAlgorithm::ChaCha20Poly1305),
            "aes-256-gcm" | "aes256gcm" => Ok(AeadAlgorithm::Aes256Gcm),
            _ => Err(CryptoError::UnsupportedAead(s.to_string())),
        }
    }
}

impl fmt::Display for AeadAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Argon2id cost parameters; memory is in KiB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParameters {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for KdfParameters {
    fn default() -> Self {
        Self {
            time_cost: KDF_TIME_COST,
            memory_cost: KDF_MEMORY_COST,
            parallelism: KDF_PARALLELISM,
            hash_len: KDF_HASH_LEN,
        }
    }
}

impl KdfParameters {
    /// Reject parameters outside the accepted window before any work is done.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.time_cost == 0 || self.time_cost > KDF_MAX_TIME_COST {
            return Err(CryptoError::KdfParameters(format!(
                "time_cost {} out of range",
                self.time_cost
            )));
        }
        if self.parallelism == 0 || self.parallelism > KDF_MAX_PARALLELISM {
            return Err(CryptoError::KdfParameters(format!(
                "parallelism {} out of range",
                self.parallelism
            )));
        }
        if self.memory_cost < 8 * self.parallelism || self.memory_cost > KDF_MAX_MEMORY_COST {
            return Err(CryptoError::KdfParameters(format!(
                "memory_cost {} out of range",
                self.memory_cost
            )));
        }
        if self.hash_len as usize != KEY_LEN {
            return Err(CryptoError::KdfParameters(format!("hash_len must be {}", KEY_LEN)));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum CryptoError {
    UnsupportedAead(String),
    UnsupportedKdf(String),
    KdfParameters(String),
    InvalidKeyLen { expected: usize, actual: usize },
    InvalidLength { field: &'static str, expected: usize, actual: usize },
    /// Any AEAD open failure: wrong passphrase or tampered input.
    DecryptionFailed,
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            UnsupportedAead(name) => write!(f, "unsupported AEAD algorithm: {}", name),
            UnsupportedKdf(name) => write!(f, "unsupported KDF: {}", name),
            KdfParameters(msg) => write!(f, "invalid KDF parameters: {}", msg),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            InvalidLength { field, expected, actual } =>
                write!(f, "invalid {} length: expected={}, actual={}", field, expected, actual),
            DecryptionFailed => write!(f, "decryption failed"),
            Failure(msg) => write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
