//! dictionary/types.rs
//! Dictionary entries, static code tiers and the loaded dictionary.
//!
//! Design notes:
//! - Codes are assigned by rank (1-based position in descending expected
//!   frequency) into three disjoint tiers: fixed 9-bit, `10`+12, `110`+15.
//! - A loaded dictionary is immutable and shared behind `Arc`; strictness is
//!   a per-lookup argument rather than dictionary state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::constants::UNKNOWN_MORPHEME_KEY;

/// Last rank in each tier.
pub const FIXED_TIER_LAST_RANK: usize = 64;
pub const SHORT_PREFIX_TIER_LAST_RANK: usize = 192;

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("unknown morpheme key '{0}'")]
    UnknownMorpheme(String),

    #[error("unsupported dictionary version '{0}'")]
    UnknownVersion(String),

    #[error("token index {index} out of range for dictionary of {size} entries")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("invalid dictionary: {0}")]
    Invalid(String),

    #[error("dictionary json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTier {
    Fixed,
    ShortPrefix,
    LongPrefix,
}

/// Static code of one entry, as stored in the dictionary artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryEncoding {
    Fixed {
        bits: u8,
        code: String,
    },
    Prefix {
        prefix: String,
        payload_bits: u8,
        effective_bits: u8,
        ordinal: u32,
    },
}

impl EntryEncoding {
    /// Code for a 1-based rank.
    pub fn for_rank(rank: usize) -> Self {
        if rank <= FIXED_TIER_LAST_RANK {
            EntryEncoding::Fixed {
                bits: 9,
                code: format!("{:09b}", rank - 1),
            }
        } else if rank <= SHORT_PREFIX_TIER_LAST_RANK {
            EntryEncoding::Prefix {
                prefix: "10".to_string(),
                payload_bits: 12,
                effective_bits: 14,
                ordinal: (rank - (FIXED_TIER_LAST_RANK + 1)) as u32,
            }
        } else {
            EntryEncoding::Prefix {
                prefix: "110".to_string(),
                payload_bits: 15,
                effective_bits: 18,
                ordinal: (rank - (SHORT_PREFIX_TIER_LAST_RANK + 1)) as u32,
            }
        }
    }

    pub fn tier(&self) -> CodeTier {
        match self {
            EntryEncoding::Fixed { .. } => CodeTier::Fixed,
            EntryEncoding::Prefix { prefix, .. } if prefix == "10" => CodeTier::ShortPrefix,
            EntryEncoding::Prefix { .. } => CodeTier::LongPrefix,
        }
    }

    pub fn effective_bits(&self) -> u8 {
        match self {
            EntryEncoding::Fixed { bits, .. } => *bits,
            EntryEncoding::Prefix { effective_bits, .. } => *effective_bits,
        }
    }

    /// Full code as a bit string (prefix followed by the zero-padded ordinal).
    pub fn bit_string(&self) -> String {
        match self {
            EntryEncoding::Fixed { code, .. } => code.clone(),
            EntryEncoding::Prefix { prefix, payload_bits, ordinal, .. } => {
                format!("{}{:0width$b}", prefix, ordinal, width = *payload_bits as usize)
            }
        }
    }
}

/// Expected frequency for a 1-based rank.
pub fn frequency_for_rank(rank: usize) -> u32 {
    let raw = 2400i64 - (rank as i64 - 1) * 7;
    raw.max(20) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub key: String,
    pub morpheme: String,
    pub quenya_root: String,
    pub gloss: String,
    pub linguistic_justification: String,
    pub ast_nodes: Vec<String>,
    pub frequency_per_10k_loc: u32,
    pub encoding: EntryEncoding,
}

/// Serialized dictionary artifact `{version, entries}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionarySchema {
    pub version: String,
    pub entries: Vec<DictionaryEntry>,
}

#[derive(Debug, Clone)]
pub struct MorphemeDictionary {
    version: String,
    entries: Vec<DictionaryEntry>,
    by_key: HashMap<String, usize>,
    by_node: HashMap<String, usize>,
    unknown_index: usize,
}

impl MorphemeDictionary {
    /// Validate and index a dictionary artifact.
    ///
    /// Keys must be unique, `meta:unknown` must exist and every entry's code
    /// must match the tier implied by its rank.
    pub fn from_schema(schema: DictionarySchema) -> Result<Self, DictionaryError> {
        let DictionarySchema { version, entries } = schema;
        if entries.is_empty() {
            return Err(DictionaryError::Invalid("dictionary has no entries".into()));
        }

        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_node = HashMap::new();
        for (index, entry) in entries.iter().enumerate() {
            if by_key.insert(entry.key.clone(), index).is_some() {
                return Err(DictionaryError::Invalid(format!("duplicate key '{}'", entry.key)));
            }
            let expected = EntryEncoding::for_rank(index + 1);
            if entry.encoding != expected {
                return Err(DictionaryError::Invalid(format!(
                    "entry '{}' at rank {} does not carry the rank's code",
                    entry.key,
                    index + 1
                )));
            }
            // First entry in rank order wins for shared node names.
            for node in &entry.ast_nodes {
                by_node.entry(node.clone()).or_insert(index);
            }
        }

        let unknown_index = *by_key.get(UNKNOWN_MORPHEME_KEY).ok_or_else(|| {
            DictionaryError::Invalid(format!("missing reserved entry '{}'", UNKNOWN_MORPHEME_KEY))
        })?;

        Ok(Self {
            version,
            entries,
            by_key,
            by_node,
            unknown_index,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, DictionaryError> {
        let schema: DictionarySchema = serde_json::from_str(text)?;
        Self::from_schema(schema)
    }

    /// Pretty JSON artifact form.
    pub fn to_json(&self) -> Result<String, DictionaryError> {
        let schema = DictionarySchema {
            version: self.version.clone(),
            entries: self.entries.clone(),
        };
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn unknown_index(&self) -> usize {
        self.unknown_index
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Resolve a construct key to its index.
    ///
    /// Strict lookups fail on a miss; otherwise the miss is logged and the
    /// reserved `meta:unknown` index is returned.
    pub fn index_for_key(&self, key: &str, strict: bool) -> Result<usize, DictionaryError> {
        match self.by_key.get(key) {
            Some(index) => Ok(*index),
            None if strict => Err(DictionaryError::UnknownMorpheme(key.to_string())),
            None => {
                warn!(
                    key,
                    dictionary_version = %self.version,
                    "unknown morpheme key, falling back to meta:unknown"
                );
                Ok(self.unknown_index)
            }
        }
    }

    pub fn entry_for_index(&self, index: usize) -> Result<&DictionaryEntry, DictionaryError> {
        self.entries.get(index).ok_or(DictionaryError::IndexOutOfRange {
            index,
            size: self.entries.len(),
        })
    }

    pub fn entry_for_key(&self, key: &str) -> Option<&DictionaryEntry> {
        self.by_key.get(key).map(|i| &self.entries[*i])
    }

    /// Construct key for a source-language AST node name.
    pub fn key_for_ast_node(&self, node_name: &str) -> Option<&str> {
        self.by_node
            .get(node_name)
            .map(|i| self.entries[*i].key.as_str())
    }

    pub fn encoding_for_key(&self, key: &str) -> Option<&EntryEncoding> {
        self.entry_for_key(key).map(|e| &e.encoding)
    }

    /// `morpheme<key>` for diagnostics.
    pub fn humanize(&self, index: usize) -> Result<String, DictionaryError> {
        let entry = self.entry_for_index(index)?;
        Ok(format!("{}<{}>", entry.morpheme, entry.key))
    }

    /// Sum of static code lengths for a token sequence.
    pub fn static_code_bits(&self, tokens: &[u32]) -> Result<u64, DictionaryError> {
        let mut total = 0u64;
        for token in tokens {
            total += u64::from(self.entry_for_index(*token as usize)?.encoding.effective_bits());
        }
        Ok(total)
    }
}
