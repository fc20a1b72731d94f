//! compression/config.rs
//! Compression modes and their preset configurations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compression::chunked::DEFAULT_CHUNK_SIZE;
use crate::compression::registry::{
    get_backend, resolve, BackendOptions, BACKEND_CHUNKED_RANS, BACKEND_RANS,
};
use crate::compression::types::{CompressionError, EntropyBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    Balanced,
    Maximum,
    Security,
}

impl CompressionMode {
    pub const ALL: [CompressionMode; 3] = [
        CompressionMode::Balanced,
        CompressionMode::Maximum,
        CompressionMode::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionMode::Balanced => "balanced",
            CompressionMode::Maximum => "maximum",
            CompressionMode::Security => "security",
        }
    }
}

impl Default for CompressionMode {
    fn default() -> Self {
        CompressionMode::Balanced
    }
}

impl fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionMode {
    type Err = CompressionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(CompressionMode::Balanced),
            "maximum" => Ok(CompressionMode::Maximum),
            "security" => Ok(CompressionMode::Security),
            _ => Err(CompressionError::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenOptimisation {
    None,
    FrequencyDense,
}

/// Where shared assets (token plan, string table) are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharingScope {
    File,
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    pub mode: CompressionMode,
    pub backend: &'static str,
    pub precision_bits: u32,
    pub chunk_size: usize,
    pub token_optimisation: TokenOptimisation,
    pub project_token_plan: bool,
    pub shared_string_table: bool,
    pub scope: SharingScope,
    pub description: &'static str,
}

impl CompressionConfig {
    pub fn for_mode(mode: CompressionMode) -> Self {
        match mode {
            CompressionMode::Balanced => Self {
                mode,
                backend: BACKEND_RANS,
                precision_bits: 12,
                chunk_size: DEFAULT_CHUNK_SIZE,
                token_optimisation: TokenOptimisation::FrequencyDense,
                project_token_plan: false,
                shared_string_table: false,
                scope: SharingScope::File,
                description: "Default mode balancing size and determinism.",
            },
            CompressionMode::Maximum => Self {
                mode,
                backend: BACKEND_CHUNKED_RANS,
                precision_bits: 14,
                chunk_size: DEFAULT_CHUNK_SIZE,
                token_optimisation: TokenOptimisation::FrequencyDense,
                project_token_plan: true,
                shared_string_table: true,
                scope: SharingScope::Project,
                description: "Aggressively compress using project-wide statistics.",
            },
            CompressionMode::Security => Self {
                mode,
                backend: BACKEND_RANS,
                precision_bits: 11,
                chunk_size: DEFAULT_CHUNK_SIZE,
                token_optimisation: TokenOptimisation::None,
                project_token_plan: false,
                shared_string_table: false,
                scope: SharingScope::File,
                description: "Prioritise cryptographic isolation over compression.",
            },
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CompressionError> {
        Ok(Self::for_mode(name.parse()?))
    }

    /// Swap the mode's entropy backend for `name`, which must be available.
    pub fn with_backend(mut self, name: &str) -> Result<Self, CompressionError> {
        let info = resolve(name)?;
        if !info.available {
            return Err(CompressionError::BackendUnavailable {
                name: info.name.to_string(),
                reason: info.description.to_string(),
            });
        }
        self.backend = info.name;
        Ok(self)
    }

    pub fn wants_project_planning(&self) -> bool {
        self.scope == SharingScope::Project || self.project_token_plan || self.shared_string_table
    }

    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            precision_bits: self.precision_bits,
            chunk_size: self.chunk_size,
        }
    }

    pub fn backend(&self) -> Result<Box<dyn EntropyBackend>, CompressionError> {
        get_backend(self.backend, self.backend_options())
    }
}

/// Mode name to description.
pub fn available_modes() -> Vec<(&'static str, &'static str)> {
    CompressionMode::ALL
        .iter()
        .map(|m| (m.as_str(), CompressionConfig::for_mode(*m).description))
        .collect()
}

/// Extras JSON carried in the compression section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionExtras {
    pub mode: CompressionMode,
    pub scope: SharingScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimisation: Option<crate::compression::optimisation::OptimisationMetadata>,
}
