//! package/sections.rs
//! Payload section formats.
//!
//! Design notes:
//! - Binary sections are little-endian with explicit length prefixes; every
//!   parser consumes its section exactly and rejects trailing bytes.
//! - JSON-bearing sections always carry canonical JSON.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compression::{
    CompressionExtras, EntropyBackend, ModelSpec, RansBackend,
};
use crate::constants::{hash_ids, stream_flags, ENCODING_VERSION};
use crate::framing::{Section, SectionId, SectionView};
use crate::limits::ResourceBudget;
use crate::model::PayloadEntry;
use crate::types::PackageError;
use crate::utils::{
    b64_decode, b64_encode, canonical_json, read_varint, write_varint, zigzag_decode, zigzag_encode,
};

// -----------------------------------------------------------------------------
// Byte helpers
// -----------------------------------------------------------------------------

struct SectionReader<'a> {
    name: &'static str,
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SectionReader<'a> {
    fn new(name: &'static str, buf: &'a [u8]) -> Self {
        Self { name, buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], PackageError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| PackageError::Validation(format!("{} section truncated", self.name)))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, PackageError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, PackageError> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    fn u32(&mut self) -> Result<u32, PackageError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn str16(&mut self) -> Result<String, PackageError> {
        let len = self.u16()? as usize;
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| {
            PackageError::Validation(format!("{} section has invalid utf-8", self.name))
        })
    }

    fn bytes32(&mut self) -> Result<&'a [u8], PackageError> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    fn finish(self) -> Result<(), PackageError> {
        if self.pos != self.buf.len() {
            return Err(PackageError::Validation(format!(
                "{} section has {} trailing bytes",
                self.name,
                self.buf.len() - self.pos
            )));
        }
        Ok(())
    }
}

fn put_str16(out: &mut Vec<u8>, value: &str) -> Result<(), PackageError> {
    let len = u16::try_from(value.len()).map_err(|_| {
        PackageError::Validation(format!("string of {} bytes exceeds u16 prefix", value.len()))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

fn put_bytes32(out: &mut Vec<u8>, value: &[u8]) -> Result<(), PackageError> {
    let len = u32::try_from(value.len()).map_err(|_| {
        PackageError::Validation(format!("blob of {} bytes exceeds u32 prefix", value.len()))
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(value);
    Ok(())
}

/// u32-prefixed blob section.
pub fn blob_section(id: SectionId, payload: &[u8]) -> Result<Section, PackageError> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    put_bytes32(&mut out, payload)?;
    Ok(Section::new(id, out))
}

pub fn read_blob<'a>(name: &'static str, view: &SectionView<'a>) -> Result<&'a [u8], PackageError> {
    let mut reader = SectionReader::new(name, view.payload);
    let blob = reader.bytes32()?;
    reader.finish()?;
    Ok(blob)
}

// -----------------------------------------------------------------------------
// Stream header
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub dictionary_version: String,
    pub encoder_version: String,
    pub source_language: String,
    pub source_language_version: String,
    pub symbol_count: u32,
    /// Lowercase hex, empty when the source hash was not recorded.
    pub source_hash: String,
    pub has_source_map: bool,
}

impl StreamHeader {
    pub fn to_section(&self) -> Result<Section, PackageError> {
        let mut out = Vec::with_capacity(64 + 32);
        put_str16(&mut out, &self.dictionary_version)?;
        put_str16(&mut out, &self.encoder_version)?;
        put_str16(&mut out, &self.source_language)?;
        put_str16(&mut out, &self.source_language_version)?;
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        out.push(hash_ids::SHA256);
        let mut digest = [0u8; 32];
        if !self.source_hash.is_empty() {
            hex::decode_to_slice(&self.source_hash, &mut digest)
                .map_err(|e| PackageError::Validation(format!("source hash: {}", e)))?;
        }
        out.extend_from_slice(&digest);
        let flags = if self.has_source_map { stream_flags::HAS_SOURCE_MAP } else { 0 };
        Ok(Section::with_flags(SectionId::StreamHeader, flags, out))
    }

    pub fn parse(view: &SectionView<'_>) -> Result<Self, PackageError> {
        if view.flags & !stream_flags::HAS_SOURCE_MAP != 0 {
            return Err(PackageError::Validation(format!(
                "unknown stream header flags 0x{:04x}",
                view.flags
            )));
        }
        let mut reader = SectionReader::new("stream header", view.payload);
        let dictionary_version = reader.str16()?;
        let encoder_version = reader.str16()?;
        let source_language = reader.str16()?;
        let source_language_version = reader.str16()?;
        let symbol_count = reader.u32()?;
        let hash_type = reader.u8()?;
        if hash_type != hash_ids::SHA256 {
            return Err(PackageError::Validation(format!("unknown source hash type {}", hash_type)));
        }
        let digest = reader.take(32)?;
        reader.finish()?;
        let source_hash = if digest.iter().all(|b| *b == 0) {
            String::new()
        } else {
            hex::encode(digest)
        };
        Ok(Self {
            dictionary_version,
            encoder_version,
            source_language,
            source_language_version,
            symbol_count,
            source_hash,
            has_source_map: view.flags & stream_flags::HAS_SOURCE_MAP != 0,
        })
    }
}

// -----------------------------------------------------------------------------
// Compression
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionSection {
    pub backend: String,
    pub symbol_count: u32,
    /// Canonical model JSON as stored; the metadata digest covers these bytes.
    pub model_json: Vec<u8>,
    pub model: ModelSpec,
    pub extras: Option<CompressionExtras>,
}

impl CompressionSection {
    pub fn new(
        backend: &str,
        symbol_count: u32,
        model: ModelSpec,
        extras: Option<CompressionExtras>,
    ) -> Result<Self, PackageError> {
        Ok(Self {
            backend: backend.to_string(),
            symbol_count,
            model_json: model.to_canonical_json()?,
            model,
            extras,
        })
    }

    pub fn to_section(&self) -> Result<Section, PackageError> {
        let mut out = Vec::with_capacity(self.model_json.len() + 64);
        put_str16(&mut out, &self.backend)?;
        out.extend_from_slice(&self.symbol_count.to_le_bytes());
        put_bytes32(&mut out, &self.model_json)?;
        let extras = match &self.extras {
            Some(extras) => canonical_json(extras)?,
            None => Vec::new(),
        };
        put_bytes32(&mut out, &extras)?;
        Ok(Section::new(SectionId::Compression, out))
    }

    pub fn parse(view: &SectionView<'_>, budget: &ResourceBudget) -> Result<Self, PackageError> {
        let mut reader = SectionReader::new("compression", view.payload);
        let backend = reader.str16()?;
        let symbol_count = reader.u32()?;
        let model_json = reader.bytes32()?;
        budget.ensure_model(model_json.len())?;
        let extras_json = reader.bytes32()?;
        reader.finish()?;

        let model = ModelSpec::from_json(model_json)?;
        let extras = if extras_json.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(extras_json)?)
        };
        Ok(Self {
            backend,
            symbol_count,
            model_json: model_json.to_vec(),
            model,
            extras,
        })
    }

    pub fn digest(&self) -> String {
        crate::utils::sha256_hex(&self.model_json)
    }
}

// -----------------------------------------------------------------------------
// Payload record and channels
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadRecord {
    pub encoding_version: String,
    pub channel_bits: u32,
    pub entries: Vec<PayloadEntry>,
    pub structured_channel: Vec<Value>,
}

impl PayloadRecord {
    pub fn new(
        channel_bits: u32,
        entries: Vec<PayloadEntry>,
        structured_channel: Vec<Value>,
    ) -> Self {
        Self {
            encoding_version: ENCODING_VERSION.to_string(),
            channel_bits,
            entries,
            structured_channel,
        }
    }

    pub fn to_section(&self) -> Result<Section, PackageError> {
        blob_section(SectionId::PayloadRecord, &canonical_json(self)?)
    }

    pub fn parse(view: &SectionView<'_>, budget: &ResourceBudget) -> Result<Self, PackageError> {
        let blob = read_blob("payload record", view)?;
        budget.ensure_payload(blob.len())?;
        let record: Self = serde_json::from_slice(blob)?;
        if record.encoding_version != ENCODING_VERSION {
            return Err(PackageError::mismatch(
                "encoding_version",
                ENCODING_VERSION,
                &record.encoding_version,
            ));
        }
        Ok(record)
    }
}

pub const LAYOUT_VARINT: &str = "varint";
pub const LAYOUT_ZIGZAG: &str = "zigzag-varint";
pub const LAYOUT_DIRECT: &str = "direct";

const BYTE_ALPHABET: usize = 256;
const FLAG_ALPHABET: usize = 2;

/// JSON body of one payload channel section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelBlob {
    pub value_count: usize,
    pub symbol_count: usize,
    pub alphabet_size: usize,
    pub layout: String,
    pub model: ModelSpec,
    pub data: String,
}

impl ChannelBlob {
    fn compress(
        backend: &RansBackend,
        symbols: &[u32],
        value_count: usize,
        alphabet_size: usize,
        layout: &str,
    ) -> Result<Self, PackageError> {
        let (data, model) = backend.compress(symbols, alphabet_size)?;
        Ok(Self {
            value_count,
            symbol_count: symbols.len(),
            alphabet_size,
            layout: layout.to_string(),
            model,
            data: b64_encode(&data),
        })
    }

    pub fn to_section(&self, id: SectionId) -> Result<Section, PackageError> {
        blob_section(id, &canonical_json(self)?)
    }

    pub fn parse(view: &SectionView<'_>, budget: &ResourceBudget) -> Result<Self, PackageError> {
        let blob = read_blob("payload channel", view)?;
        budget.ensure_payload(blob.len())?;
        Ok(serde_json::from_slice(blob)?)
    }

    fn symbols(
        &self,
        layout: &str,
        alphabet_size: usize,
        budget: &ResourceBudget,
    ) -> Result<Vec<u32>, PackageError> {
        if self.layout != layout {
            return Err(PackageError::mismatch("channel layout", layout, &self.layout));
        }
        if self.alphabet_size != alphabet_size {
            return Err(PackageError::mismatch(
                "channel alphabet",
                alphabet_size,
                self.alphabet_size,
            ));
        }
        budget.ensure_symbols(self.symbol_count)?;
        budget.ensure_symbols(self.value_count)?;
        let data = b64_decode(&self.data)?;
        budget.ensure_compressed(data.len())?;
        let backend = RansBackend::new(self.model.precision_bits())?;
        Ok(backend.decode(&data, &self.model, self.symbol_count)?)
    }

    pub fn encode_varints<I>(
        backend: &RansBackend,
        values: I,
        zigzag: bool,
    ) -> Result<Self, PackageError>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut bytes = Vec::new();
        let mut count = 0usize;
        for value in values {
            write_varint(&mut bytes, value);
            count += 1;
        }
        let symbols: Vec<u32> = bytes.into_iter().map(u32::from).collect();
        let layout = if zigzag { LAYOUT_ZIGZAG } else { LAYOUT_VARINT };
        Self::compress(backend, &symbols, count, BYTE_ALPHABET, layout)
    }

    pub fn encode_signed(backend: &RansBackend, values: &[i64]) -> Result<Self, PackageError> {
        Self::encode_varints(backend, values.iter().map(|v| zigzag_encode(*v)), true)
    }

    pub fn encode_flags(backend: &RansBackend, flags: &[bool]) -> Result<Self, PackageError> {
        let symbols: Vec<u32> = flags.iter().map(|f| u32::from(*f)).collect();
        Self::compress(backend, &symbols, flags.len(), FLAG_ALPHABET, LAYOUT_DIRECT)
    }

    pub fn decode_varints(
        &self,
        zigzag: bool,
        budget: &ResourceBudget,
    ) -> Result<Vec<u64>, PackageError> {
        let layout = if zigzag { LAYOUT_ZIGZAG } else { LAYOUT_VARINT };
        let symbols = self.symbols(layout, BYTE_ALPHABET, budget)?;
        let bytes = symbols
            .into_iter()
            .map(|s| {
                u8::try_from(s)
                    .map_err(|_| PackageError::Validation("channel symbol exceeds a byte".into()))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        let mut values = Vec::with_capacity(self.value_count);
        let mut offset = 0usize;
        while offset < bytes.len() {
            values.push(read_varint(&bytes, &mut offset)?);
        }
        if values.len() != self.value_count {
            return Err(PackageError::mismatch(
                "channel value count",
                self.value_count,
                values.len(),
            ));
        }
        Ok(values)
    }

    pub fn decode_signed(&self, budget: &ResourceBudget) -> Result<Vec<i64>, PackageError> {
        Ok(self.decode_varints(true, budget)?.into_iter().map(zigzag_decode).collect())
    }

    pub fn decode_flags(&self, budget: &ResourceBudget) -> Result<Vec<bool>, PackageError> {
        let symbols = self.symbols(LAYOUT_DIRECT, FLAG_ALPHABET, budget)?;
        if symbols.len() != self.value_count {
            return Err(PackageError::mismatch(
                "flag channel value count",
                self.value_count,
                symbols.len(),
            ));
        }
        Ok(symbols.into_iter().map(|s| s != 0).collect())
    }
}
