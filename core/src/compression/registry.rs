//! compression/registry.rs
//! Backend registry and factory functions.

use std::collections::BTreeMap;

use crate::compression::chunked::{ChunkedRansBackend, DEFAULT_CHUNK_SIZE};
use crate::compression::fse::FseBackend;
use crate::compression::rans::RansCodec;
use crate::compression::types::{CompressionError, EntropyBackend, ModelSpec};
use crate::constants::DEFAULT_PRECISION_BITS;

pub const BACKEND_RANS: &str = "rans";
pub const BACKEND_CHUNKED_RANS: &str = "chunked-rans";
pub const BACKEND_FSE: &str = "fse";
pub const BACKEND_FSE_PRODUCTION: &str = "fse-production";
pub const BACKEND_DUDA: &str = "duda";

pub struct BackendInfo {
    pub name: &'static str,
    pub available: bool,
    pub chunked: bool,
    pub description: &'static str,
}

pub fn resolve(name: &str) -> Result<BackendInfo, CompressionError> {
    match name {
        BACKEND_RANS => Ok(BackendInfo {
            name: BACKEND_RANS,
            available: true,
            chunked: false,
            description: "static rANS with a per-package frequency table",
        }),
        BACKEND_CHUNKED_RANS => Ok(BackendInfo {
            name: BACKEND_CHUNKED_RANS,
            available: true,
            chunked: true,
            description: "rANS with an independent table per symbol chunk",
        }),
        BACKEND_FSE => Ok(BackendInfo {
            name: BACKEND_FSE,
            available: true,
            chunked: false,
            description: "legacy name for fse-production; sets the compression:fse feature",
        }),
        BACKEND_FSE_PRODUCTION => Ok(BackendInfo {
            name: BACKEND_FSE_PRODUCTION,
            available: true,
            chunked: false,
            description: "count-table model coded with rANS at precision table_log",
        }),
        BACKEND_DUDA => Ok(BackendInfo {
            name: BACKEND_DUDA,
            available: false,
            chunked: false,
            description: "tabled ANS variant; not built into this library",
        }),
        other => Err(CompressionError::UnknownBackend(other.to_string())),
    }
}

/// Construction options shared by all backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendOptions {
    pub precision_bits: u32,
    pub chunk_size: usize,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            precision_bits: DEFAULT_PRECISION_BITS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RansBackend {
    codec: RansCodec,
}

impl RansBackend {
    pub fn new(precision_bits: u32) -> Result<Self, CompressionError> {
        Ok(Self { codec: RansCodec::new(precision_bits)? })
    }
}

impl EntropyBackend for RansBackend {
    fn name(&self) -> &'static str {
        BACKEND_RANS
    }

    fn build_model(
        &self,
        symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<ModelSpec, CompressionError> {
        let table = self.codec.build_table(symbols, alphabet_size.max(1))?;
        Ok(ModelSpec::Rans(table.to_model()))
    }

    fn encode(&self, symbols: &[u32], model: &mut ModelSpec) -> Result<Vec<u8>, CompressionError> {
        let ModelSpec::Rans(rans) = model else {
            return Err(CompressionError::ModelMismatch("rans requires a static model".into()));
        };
        let table = RansCodec::table_from_model(rans)?;
        self.codec.encode(symbols, &table)
    }

    fn decode(
        &self,
        data: &[u8],
        model: &ModelSpec,
        symbol_count: usize,
    ) -> Result<Vec<u32>, CompressionError> {
        let ModelSpec::Rans(rans) = model else {
            return Err(CompressionError::ModelMismatch("rans requires a static model".into()));
        };
        let table = RansCodec::table_from_model(rans)?;
        self.codec.decode(data, &table, symbol_count)
    }
}

/// Instantiate a backend by wire name.
pub fn get_backend(
    name: &str,
    options: BackendOptions,
) -> Result<Box<dyn EntropyBackend>, CompressionError> {
    let info = resolve(name)?;
    if !info.available {
        return Err(CompressionError::BackendUnavailable {
            name: info.name.to_string(),
            reason: info.description.to_string(),
        });
    }
    match info.name {
        BACKEND_RANS => Ok(Box::new(RansBackend::new(options.precision_bits)?)),
        BACKEND_CHUNKED_RANS => Ok(Box::new(ChunkedRansBackend::new(
            options.precision_bits,
            options.chunk_size,
        )?)),
        BACKEND_FSE => Ok(Box::new(FseBackend::new(BACKEND_FSE, options.precision_bits))),
        BACKEND_FSE_PRODUCTION => Ok(Box::new(FseBackend::new(
            BACKEND_FSE_PRODUCTION,
            options.precision_bits,
        ))),
        other => Err(CompressionError::UnknownBackend(other.to_string())),
    }
}

/// Every registered backend name mapped to `available` or the reason it is not.
pub fn available_backends() -> BTreeMap<String, String> {
    [BACKEND_RANS, BACKEND_CHUNKED_RANS, BACKEND_FSE, BACKEND_FSE_PRODUCTION, BACKEND_DUDA]
        .iter()
        .filter_map(|name| resolve(name).ok())
        .map(|info| {
            let status = if info.available { "available" } else { info.description };
            (info.name.to_string(), status.to_string())
        })
        .collect()
}
