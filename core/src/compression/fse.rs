//! compression/fse.rs
//! Finite-state-entropy backend names (`fse`, `fse-production`).
//!
//! The model is the raw count table `{table_log, counts}`; symbols are coded
//! with the rANS codec at precision `table_log`, so packages that name either
//! backend decode without an external FSE library.

use tracing::debug;

use crate::compression::rans::{RansCodec, RansTable};
use crate::compression::types::{CompressionError, EntropyBackend, FseModel, ModelSpec};

#[derive(Debug, Clone, Copy)]
pub struct FseBackend {
    name: &'static str,
    table_log: u32,
}

impl FseBackend {
    pub fn new(name: &'static str, table_log: u32) -> Self {
        Self { name, table_log }
    }

    pub fn table_log(&self) -> u32 {
        self.table_log
    }

    fn fse<'m>(&self, model: &'m ModelSpec) -> Result<&'m FseModel, CompressionError> {
        match model {
            ModelSpec::Fse(m) => Ok(m),
            _ => Err(CompressionError::ModelMismatch(format!(
                "{} requires a count model",
                self.name
            ))),
        }
    }

    fn codec_for(model: &FseModel) -> Result<(RansCodec, RansTable), CompressionError> {
        let precision = model.precision_bits();
        let table = RansCodec::table_from_counts(precision, &model.counts)?;
        Ok((RansCodec::new(precision)?, table))
    }
}

impl EntropyBackend for FseBackend {
    fn name(&self) -> &'static str {
        self.name
    }

    fn build_model(
        &self,
        symbols: &[u32],
        alphabet_size: usize,
    ) -> Result<ModelSpec, CompressionError> {
        let mut counts = vec![0u64; alphabet_size.max(1)];
        for symbol in symbols {
            let alphabet = counts.len();
            let slot = counts
                .get_mut(*symbol as usize)
                .ok_or(CompressionError::SymbolOutOfRange { symbol: *symbol, alphabet })?;
            *slot += 1;
        }
        Ok(ModelSpec::Fse(FseModel { table_log: self.table_log, counts, dictionary_key: None }))
    }

    fn encode(&self, symbols: &[u32], model: &mut ModelSpec) -> Result<Vec<u8>, CompressionError> {
        let (codec, table) = Self::codec_for(self.fse(model)?)?;
        let out = codec.encode(symbols, &table)?;
        debug!(
            backend = self.name,
            precision = codec.precision_bits(),
            bytes = out.len(),
            "fse encode"
        );
        Ok(out)
    }

    fn decode(
        &self,
        data: &[u8],
        model: &ModelSpec,
        symbol_count: usize,
    ) -> Result<Vec<u32>, CompressionError> {
        let (codec, table) = Self::codec_for(self.fse(model)?)?;
        codec.decode(data, &table, symbol_count)
    }
}
