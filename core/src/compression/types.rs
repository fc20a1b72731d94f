//! compression/types.rs
//! Compression models, errors and the backend trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_PRECISION_BITS, MIN_PRECISION_BITS};
use crate::utils::{canonical_json, sha256_hex};

/// Static rANS model `{precision_bits, frequencies}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RansModel {
    pub precision_bits: u32,
    pub frequencies: Vec<u32>,
}

/// Per-chunk table recorded by the chunked backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub offset: usize,
    pub length: usize,
    pub symbol_count: usize,
    pub frequencies: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedModel {
    pub mode: String,
    pub chunk_size: usize,
    pub precision_bits: u32,
    pub alphabet_size: usize,
    pub chunks: Vec<ChunkMeta>,
}

/// Finite-state-entropy model: raw symbol counts plus the table size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FseModel {
    pub table_log: u32,
    pub counts: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_key: Option<String>,
}

impl FseModel {
    /// `table_log` clamped to the range the rANS coder accepts.
    pub fn precision_bits(&self) -> u32 {
        self.table_log.clamp(MIN_PRECISION_BITS, MAX_PRECISION_BITS)
    }
}

/// Model JSON as carried in the compression section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSpec {
    Chunked(ChunkedModel),
    Fse(FseModel),
    Rans(RansModel),
}

impl ModelSpec {
    pub fn precision_bits(&self) -> u32 {
        match self {
            ModelSpec::Chunked(m) => m.precision_bits,
            ModelSpec::Fse(m) => m.precision_bits(),
            ModelSpec::Rans(m) => m.precision_bits,
        }
    }

    pub fn to_canonical_json(&self) -> Result<Vec<u8>, CompressionError> {
        canonical_json(self).map_err(|e| CompressionError::Model(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, CompressionError> {
        serde_json::from_slice(bytes).map_err(|e| CompressionError::Model(e.to_string()))
    }

    /// SHA-256 hex over the canonical JSON form.
    pub fn digest(&self) -> Result<String, CompressionError> {
        Ok(sha256_hex(&self.to_canonical_json()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    UnknownBackend(String),
    BackendUnavailable { name: String, reason: String },
    UnknownMode(String),
    InvalidPrecision(u32),
    AlphabetTooLarge { alphabet: usize, total: usize },
    SymbolOutOfRange { symbol: u32, alphabet: usize },
    ZeroFrequency(u32),
    NormalisationFailed,
    StreamTooShort,
    Exhausted,
    SymbolCountMismatch { expected: usize, actual: usize },
    ModelMismatch(String),
    Model(String),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompressionError::*;
        match self {
            UnknownBackend(name) =>
                write!(f, "unknown compression backend: {}", name),
            BackendUnavailable { name, reason } =>
                write!(f, "compression backend {} unavailable: {}", name, reason),
            UnknownMode(name) =>
                write!(f, "unknown compression mode: {}", name),
            InvalidPrecision(bits) =>
                write!(f, "precision_bits must be between 8 and 16, got {}", bits),
            AlphabetTooLarge { alphabet, total } =>
                write!(f, "alphabet of {} symbols does not fit a table of {}", alphabet, total),
            SymbolOutOfRange { symbol, alphabet } =>
                write!(f, "symbol {} outside alphabet of {}", symbol, alphabet),
            ZeroFrequency(symbol) =>
                write!(f, "symbol {} has zero frequency", symbol),
            NormalisationFailed =>
                write!(f, "frequency normalisation failed"),
            StreamTooShort =>
                write!(f, "encoded stream too short"),
            Exhausted =>
                write!(f, "ran out of renormalisation bytes"),
            SymbolCountMismatch { expected, actual } =>
                write!(f, "decoded symbol count mismatch: expected {}, got {}", expected, actual),
            ModelMismatch(msg) =>
                write!(f, "model mismatch: {}", msg),
            Model(msg) =>
                write!(f, "invalid compression model: {}", msg),
        }
    }
}

impl std::error::Error for CompressionError {}

/// Entropy backend over integer symbol streams.
// Require Send + Sync so one backend can serve parallel project encodes.
pub trait EntropyBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Derive a model for `symbols` over `alphabet_size`.
    fn build_model(
        &self,
        symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<ModelSpec, CompressionError>;

    /// Encode with `model`; backends that derive state while encoding
    /// (chunk tables) record it into the model.
    fn encode(&self, symbols: &[u32], model: &mut ModelSpec) -> Result<Vec<u8>, CompressionError>;

    fn decode(
        &self,
        data: &[u8],
        model: &ModelSpec,
        symbol_count: usize,
    ) -> Result<Vec<u32>, CompressionError>;

    /// `build_model` followed by `encode`.
    fn compress(
        &self,
        symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<(Vec<u8>, ModelSpec), CompressionError> {
        let mut model = self.build_model(symbols, alphabet_size)?;
        let data = self.encode(symbols, &mut model)?;
        Ok((data, model))
    }
}
