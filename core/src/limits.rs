//! limits.rs
//! Resource budget enforced while decoding untrusted packages.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBudget {
    pub max_symbols: usize,
    pub max_model_bytes: usize,
    pub max_compressed_bytes: usize,
    pub max_string_table_bytes: usize,
    pub max_payload_bytes: usize,
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self {
            max_symbols: 10_000_000,
            max_model_bytes: 4 * 1024 * 1024,
            max_compressed_bytes: 64 * 1024 * 1024,
            max_string_table_bytes: 64 * 1024 * 1024,
            max_payload_bytes: 64 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitError {
    pub resource: &'static str,
    pub have: usize,
    pub max: usize,
}

impl fmt::Display for LimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resource budget exceeded for {}: {} > {}",
            self.resource, self.have, self.max
        )
    }
}

impl std::error::Error for LimitError {}

impl ResourceBudget {
    #[inline]
    fn check(resource: &'static str, have: usize, max: usize) -> Result<(), LimitError> {
        if have > max {
            return Err(LimitError { resource, have, max });
        }
        Ok(())
    }

    pub fn ensure_symbols(&self, count: usize) -> Result<(), LimitError> {
        Self::check("symbols", count, self.max_symbols)
    }

    pub fn ensure_model(&self, model_json_len: usize) -> Result<(), LimitError> {
        Self::check("compression model", model_json_len, self.max_model_bytes)
    }

    pub fn ensure_compressed(&self, len: usize) -> Result<(), LimitError> {
        Self::check("compressed tokens", len, self.max_compressed_bytes)
    }

    pub fn ensure_string_table(&self, len: usize) -> Result<(), LimitError> {
        Self::check("string table", len, self.max_string_table_bytes)
    }

    pub fn ensure_payload(&self, len: usize) -> Result<(), LimitError> {
        Self::check("payload", len, self.max_payload_bytes)
    }
}
