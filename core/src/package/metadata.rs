//! package/metadata.rs
//! Package metadata bound into the AEAD associated data.

use serde::{Deserialize, Serialize};

use crate::model::KeyManagement;
use crate::types::PackageError;
use crate::versioning::parse_any_version;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub package_version: String,
    pub dictionary_version: String,
    pub encoder_version: String,
    pub source_language: String,
    pub source_language_version: String,
    pub source_hash: String,
    pub compression_backend: String,
    pub compression_model_digest: String,
    pub symbol_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_encoding: Option<String>,
    #[serde(flatten)]
    pub key_management: KeyManagement,
}

fn is_hex_digest(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl PackageMetadata {
    pub fn validate(&self) -> Result<(), PackageError> {
        parse_any_version(&self.package_version)?;
        let required = [
            ("dictionary_version", &self.dictionary_version),
            ("encoder_version", &self.encoder_version),
            ("source_language", &self.source_language),
            ("compression_backend", &self.compression_backend),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(PackageError::Validation(format!(
                    "metadata field '{}' is empty",
                    field
                )));
            }
        }
        if !self.source_hash.is_empty() && !is_hex_digest(&self.source_hash) {
            return Err(PackageError::Validation(
                "source_hash must be a lowercase sha256 hex digest".into(),
            ));
        }
        if !is_hex_digest(&self.compression_model_digest) {
            return Err(PackageError::Validation(
                "compression_model_digest must be a sha256 hex digest".into(),
            ));
        }
        if let Some(ts) = &self.timestamp {
            chrono::DateTime::parse_from_rfc3339(ts)
                .map_err(|e| PackageError::Validation(format!("timestamp '{}': {}", ts, e)))?;
        }
        Ok(())
    }
}

/// Current UTC time in RFC 3339 with second precision.
pub fn utc_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
