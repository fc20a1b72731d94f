//! compression/chunked.rs
//! rANS applied independently to fixed-size symbol chunks.
//!
//! Each chunk carries its own table in the model, so adjacent regions with
//! different statistics do not dilute each other.

use tracing::debug;

use crate::compression::rans::{ensure_precision, RansCodec};
use crate::compression::types::{
    ChunkMeta, ChunkedModel, CompressionError, EntropyBackend, ModelSpec, RansModel,
};

pub const DEFAULT_CHUNK_SIZE: usize = 32_768;
pub const CHUNKED_MODE: &str = "chunked";

#[derive(Debug, Clone, Copy)]
pub struct ChunkedRansBackend {
    codec: RansCodec,
    chunk_size: usize,
}

impl ChunkedRansBackend {
    pub fn new(precision_bits: u32, chunk_size: usize) -> Result<Self, CompressionError> {
        if chunk_size == 0 {
            return Err(CompressionError::Model("chunk_size must be positive".into()));
        }
        Ok(Self {
            codec: RansCodec::new(precision_bits)?,
            chunk_size,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn chunked<'m>(&self, model: &'m ModelSpec) -> Result<&'m ChunkedModel, CompressionError> {
        match model {
            ModelSpec::Chunked(m) if m.mode == CHUNKED_MODE => Ok(m),
            _ => Err(CompressionError::ModelMismatch(
                "chunked-rans requires a chunked model".into(),
            )),
        }
    }
}

impl EntropyBackend for ChunkedRansBackend {
    fn name(&self) -> &'static str {
        "chunked-rans"
    }

    fn build_model(
        &self,
        _symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<ModelSpec, CompressionError> {
        Ok(ModelSpec::Chunked(ChunkedModel {
            mode: CHUNKED_MODE.to_string(),
            chunk_size: self.chunk_size,
            precision_bits: self.codec.precision_bits(),
            alphabet_size: alphabet_size.max(1),
            chunks: Vec::new(),
        }))
    }

    fn encode(&self, symbols: &[u32], model: &mut ModelSpec) -> Result<Vec<u8>, CompressionError> {
        let ModelSpec::Chunked(chunked) = model else {
            return Err(CompressionError::ModelMismatch(
                "chunked-rans requires a chunked model".into(),
            ));
        };
        let codec = RansCodec::new(chunked.precision_bits)?;
        let chunk_size = chunked.chunk_size.max(1);

        let mut out = Vec::new();
        let mut chunks = Vec::with_capacity(symbols.len() / chunk_size + 1);
        for chunk in symbols.chunks(chunk_size) {
            let table = codec.build_table(chunk, chunked.alphabet_size)?;
            let encoded = codec.encode(chunk, &table)?;
            chunks.push(ChunkMeta {
                offset: out.len(),
                length: encoded.len(),
                symbol_count: chunk.len(),
                frequencies: table.frequencies().to_vec(),
            });
            out.extend_from_slice(&encoded);
        }
        debug!(chunks = chunks.len(), bytes = out.len(), "chunked rans encode");
        chunked.chunks = chunks;
        Ok(out)
    }

    fn decode(
        &self,
        data: &[u8],
        model: &ModelSpec,
        symbol_count: usize,
    ) -> Result<Vec<u32>, CompressionError> {
        let chunked = self.chunked(model)?;
        ensure_precision(chunked.precision_bits)?;

        let declared: usize = chunked.chunks.iter().map(|c| c.symbol_count).sum();
        if declared != symbol_count {
            return Err(CompressionError::SymbolCountMismatch {
                expected: symbol_count,
                actual: declared,
            });
        }

        let mut out = Vec::with_capacity(symbol_count);
        for chunk in &chunked.chunks {
            let end = chunk
                .offset
                .checked_add(chunk.length)
                .filter(|end| *end <= data.len())
                .ok_or_else(|| CompressionError::ModelMismatch(format!(
                    "chunk at offset {} overruns {} data bytes",
                    chunk.offset,
                    data.len()
                )))?;
            if chunk.frequencies.len() != chunked.alphabet_size {
                return Err(CompressionError::ModelMismatch(
                    "chunk table does not match the alphabet size".into(),
                ));
            }
            let table = RansCodec::table_from_model(&RansModel {
                precision_bits: chunked.precision_bits,
                frequencies: chunk.frequencies.clone(),
            })?;
            out.extend(self.codec.decode(&data[chunk.offset..end], &table, chunk.symbol_count)?);
        }
        Ok(out)
    }
}

