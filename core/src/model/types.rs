//! model/types.rs
//! Errors raised while building or replaying token streams.

use std::fmt;

use crate::compression::CompressionError;
use crate::limits::LimitError;
use crate::model::payload::PayloadChannel;
use crate::utils::VarintError;

#[derive(Debug)]
pub enum ModelError {
    EntriesExhausted,
    ChannelExhausted(PayloadChannel),
    UnexpectedPayload { expected: String, found: String },
    ChannelMismatch { expected: PayloadChannel, found: PayloadChannel },
    KindMismatch { expected: String, found: String },
    TrailingPayloads(usize),
    Inconsistent(String),
    SourceMapLength { tokens: usize, mappings: usize },
    SourceMap(String),
    MissingString(String),
    StringIndex { index: usize, size: usize },
    StringTable(String),
    Varint(VarintError),
    Compression(CompressionError),
    Limit(LimitError),
    Json(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ModelError::*;
        match self {
            EntriesExhausted => write!(f, "payload stream exhausted early"),
            ChannelExhausted(ch) => write!(f, "payload channel {} exhausted early", ch.code()),
            UnexpectedPayload { expected, found } =>
                write!(f, "expected payload '{}' but found '{}'", expected, found),
            ChannelMismatch { expected, found } =>
                write!(
                    f,
                    "payload channel mismatch: expected {} but found {}",
                    expected.code(),
                    found.code()
                ),
            KindMismatch { expected, found } =>
                write!(f, "payload kind mismatch: expected '{}' but found '{}'", expected, found),
            TrailingPayloads(n) => write!(f, "{} payload entries left unconsumed", n),
            Inconsistent(msg) => write!(f, "inconsistent payload channels: {}", msg),
            SourceMapLength { tokens, mappings } =>
                write!(f, "source map has {} mappings for {} tokens", mappings, tokens),
            SourceMap(msg) => write!(f, "invalid source map: {}", msg),
            MissingString(value) => write!(f, "'{}' is not present in the string table", value),
            StringIndex { index, size } =>
                write!(f, "string reference {} out of range for table of {}", index, size),
            StringTable(msg) => write!(f, "invalid string table: {}", msg),
            Varint(e) => write!(f, "{}", e),
            Compression(e) => write!(f, "{}", e),
            Limit(e) => write!(f, "{}", e),
            Json(e) => write!(f, "payload json: {}", e),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<VarintError> for ModelError {
    fn from(e: VarintError) -> Self {
        ModelError::Varint(e)
    }
}

impl From<CompressionError> for ModelError {
    fn from(e: CompressionError) -> Self {
        ModelError::Compression(e)
    }
}

impl From<LimitError> for ModelError {
    fn from(e: LimitError) -> Self {
        ModelError::Limit(e)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Json(e)
    }
}
