//! model/source_map.rs
//! Token-to-source span mapping, zlib-compressed on the wire.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::model::types::ModelError;
use crate::utils::canonical_json;

pub const SOURCE_MAP_VERSION: &str = "1.0";
pub const SYNTHETIC_NODE: &str = "synthetic";

/// Source range of a construct, `(line, column)` at each end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: (u32, u32),
    pub end: (u32, u32),
}

impl Span {
    pub fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapEntry {
    pub token: u32,
    pub key: String,
    /// `(line, column)`
    pub start: (u32, u32),
    pub end: (u32, u32),
    pub node: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub version: String,
    pub source_hash: String,
    pub dictionary_version: String,
    pub encoder_version: String,
    pub mappings: Vec<SourceMapEntry>,
}

impl SourceMap {
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let json = canonical_json(self)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&json)
            .map_err(|e| ModelError::SourceMap(e.to_string()))?;
        encoder.finish().map_err(|e| ModelError::SourceMap(e.to_string()))
    }

    /// Inflate and parse, refusing to inflate past `max_len` bytes.
    pub fn from_bytes(data: &[u8], max_len: usize) -> Result<Self, ModelError> {
        let mut json = Vec::new();
        ZlibDecoder::new(data)
            .take(max_len as u64 + 1)
            .read_to_end(&mut json)
            .map_err(|e| ModelError::SourceMap(e.to_string()))?;
        if json.len() > max_len {
            return Err(ModelError::SourceMap(format!(
                "inflated source map exceeds {} bytes",
                max_len
            )));
        }
        let map: SourceMap = serde_json::from_slice(&json)?;
        if map.version != SOURCE_MAP_VERSION {
            return Err(ModelError::SourceMap(format!("unsupported version '{}'", map.version)));
        }
        Ok(map)
    }
}

/// Collects one mapping per emitted token.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<SourceMapEntry>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens without a span map to `(0, 0)`.
    pub fn record(&mut self, token: u32, key: &str, node: Option<&str>, span: Option<Span>) {
        let span = span.unwrap_or_default();
        self.mappings.push(SourceMapEntry {
            token,
            key: key.to_string(),
            start: span.start,
            end: span.end,
            node: node.unwrap_or(SYNTHETIC_NODE).to_string(),
        });
    }

    pub fn build(
        self,
        source_hash: &str,
        dictionary_version: &str,
        encoder_version: &str,
    ) -> SourceMap {
        SourceMap {
            version: SOURCE_MAP_VERSION.to_string(),
            source_hash: source_hash.to_string(),
            dictionary_version: dictionary_version.to_string(),
            encoder_version: encoder_version.to_string(),
            mappings: self.mappings,
        }
    }
}
