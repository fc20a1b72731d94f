//! model/stream.rs
//! The per-file token stream handed between front end and assembler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ENCODER_VERSION;
use crate::model::payload::PayloadChannels;
use crate::model::source_map::SourceMap;
use crate::model::types::ModelError;
use crate::utils::sha256_hex;

/// Key management and provenance fields carried into package metadata.
///
/// All optional; absent fields are omitted from the metadata JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyManagement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_trail: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity_signature: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    pub dictionary_version: String,
    pub encoder_version: String,
    pub source_language: String,
    pub source_language_version: String,
    /// Lowercase hex SHA-256 of the source, or empty.
    pub source_hash: String,
    pub tokens: Vec<u32>,
    pub payloads: PayloadChannels,
    pub source_map: Option<SourceMap>,
    pub author: Option<String>,
    pub license: Option<String>,
    pub timestamp: Option<String>,
    pub source_encoding: Option<String>,
    pub key_management: KeyManagement,
}

impl TokenStream {
    pub fn new(
        dictionary_version: &str,
        source_language: &str,
        source_language_version: &str,
    ) -> Self {
        Self {
            dictionary_version: dictionary_version.to_string(),
            encoder_version: ENCODER_VERSION.to_string(),
            source_language: source_language.to_string(),
            source_language_version: source_language_version.to_string(),
            source_hash: String::new(),
            tokens: Vec::new(),
            payloads: PayloadChannels::new(),
            source_map: None,
            author: None,
            license: None,
            timestamp: None,
            source_encoding: None,
            key_management: KeyManagement::default(),
        }
    }

    pub fn with_source(mut self, source: &[u8]) -> Self {
        self.source_hash = sha256_hex(source);
        self
    }

    pub fn symbol_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(map) = &self.source_map {
            if map.len() != self.tokens.len() {
                return Err(ModelError::SourceMapLength {
                    tokens: self.tokens.len(),
                    mappings: map.len(),
                });
            }
        }
        self.payloads.validate()
    }
}
