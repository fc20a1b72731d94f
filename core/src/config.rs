//! config.rs
//! Caller-facing encode and decode options.
//!
//! Options deserialize from JSON with every field optional; omitted fields
//! take the defaults below.

use serde::{Deserialize, Serialize};

use crate::compression::{CompressionConfig, CompressionError, CompressionMode};
use crate::crypto::{AeadAlgorithm, KdfParameters};
use crate::limits::ResourceBudget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeOptions {
    /// Compression mode name (`balanced`, `maximum`, `security`).
    pub mode: String,
    /// Fail on keys missing from the dictionary instead of mapping them to
    /// `meta:unknown`.
    pub strict: bool,
    pub include_source_map: bool,
    /// Package versions the reader accepts; empty means current.
    pub preferred_versions: Vec<String>,
    pub aead: AeadAlgorithm,
    pub kdf: KdfParameters,
    /// Record an RFC 3339 timestamp when the stream has none.
    pub record_timestamp: bool,
    /// Worker threads for project encodes; 0 means one per CPU.
    pub workers: usize,
    /// Entropy backend overriding the mode's preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            mode: CompressionMode::Balanced.as_str().to_string(),
            strict: true,
            include_source_map: false,
            preferred_versions: Vec::new(),
            aead: AeadAlgorithm::default(),
            kdf: KdfParameters::default(),
            record_timestamp: false,
            workers: 0,
            backend: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Compression(CompressionError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid options json: {}", e),
            ConfigError::Compression(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl EncodeOptions {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(text).map_err(ConfigError::Json)?;
        options.compression_config().map_err(ConfigError::Compression)?;
        Ok(options)
    }

    pub fn with_mode(mut self, mode: CompressionMode) -> Self {
        self.mode = mode.as_str().to_string();
        self
    }

    pub fn compression_mode(&self) -> Result<CompressionMode, CompressionError> {
        self.mode.parse()
    }

    pub fn with_backend(mut self, name: impl Into<String>) -> Self {
        self.backend = Some(name.into());
        self
    }

    pub fn compression_config(&self) -> Result<CompressionConfig, CompressionError> {
        let config = CompressionConfig::for_mode(self.compression_mode()?);
        match &self.backend {
            Some(name) => config.with_backend(name),
            None => Ok(config),
        }
    }

    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub budget: ResourceBudget,
}
