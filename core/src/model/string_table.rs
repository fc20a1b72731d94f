//! model/string_table.rs
//! Frequency-ordered, prefix-compressed string table.
//!
//! Design notes:
//! - Entries are sorted by (descending frequency, value) so frequent strings
//!   get small indices and the order is deterministic.
//! - Suffix bytes are grouped by a coarse content class and each group is
//!   rANS-coded separately over the byte alphabet.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::compression::{EntropyBackend, ModelSpec, RansBackend};
use crate::limits::ResourceBudget;
use crate::model::types::ModelError;
use crate::utils::{canonical_json, read_varint, write_varint};

pub const STRING_TABLE_VERSION: u64 = 1;
pub const STRING_REF_KEY: &str = "__strref__";

const BYTE_ALPHABET: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTableEntry {
    pub value: String,
    pub frequency: u64,
    pub prefix_length: usize,
    pub suffix: String,
    pub type_id: u8,
    pub length_bucket: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: Vec<StringTableEntry>,
    index: HashMap<String, usize>,
}

/// Content class: 0 generic, 1 identifier, 2 path/URL, 3 prose, 4 structured text.
pub fn classify_string(value: &str) -> u8 {
    let text = value.trim();
    if text.is_empty() {
        return 0;
    }
    if text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return 1;
    }
    if text.contains("://") || text.contains('/') || text.contains('\\') {
        return 2;
    }
    let lowered = text.to_lowercase();
    if ["{", "[", "select", "insert", "update", "delete", "with"]
        .iter()
        .any(|p| lowered.starts_with(p))
    {
        return 4;
    }
    let has_space = text.chars().any(char::is_whitespace);
    let has_punct = text.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    if has_space && has_punct {
        return 3;
    }
    0
}

pub fn length_bucket(value: &str) -> u8 {
    match value.chars().count() {
        0..=8 => 0,
        9..=32 => 1,
        33..=128 => 2,
        _ => 3,
    }
}

fn common_prefix_chars(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

impl StringTable {
    pub fn build<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        let mut ordered: Vec<(&str, u64)> = counts.into_iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        let mut entries = Vec::with_capacity(ordered.len());
        let mut previous = "";
        for (value, frequency) in ordered {
            let prefix_length = common_prefix_chars(previous, value);
            entries.push(StringTableEntry {
                value: value.to_string(),
                frequency,
                prefix_length,
                suffix: value.chars().skip(prefix_length).collect(),
                type_id: classify_string(value),
                length_bucket: length_bucket(value),
            });
            previous = value;
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<StringTableEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.value.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StringTableEntry] {
        &self.entries
    }

    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    pub fn index_for(&self, value: &str) -> Result<usize, ModelError> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| ModelError::MissingString(value.to_string()))
    }

    pub fn string_for_index(&self, index: usize) -> Result<&str, ModelError> {
        self.entries
            .get(index)
            .map(|e| e.value.as_str())
            .ok_or(ModelError::StringIndex { index, size: self.entries.len() })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let mut out = Vec::new();
        write_varint(&mut out, STRING_TABLE_VERSION);
        write_varint(&mut out, self.entries.len() as u64);

        let mut grouped: BTreeMap<u8, Vec<u32>> = BTreeMap::new();
        for entry in &self.entries {
            let suffix = entry.suffix.as_bytes();
            write_varint(&mut out, entry.prefix_length as u64);
            write_varint(&mut out, suffix.len() as u64);
            write_varint(&mut out, entry.frequency);
            write_varint(&mut out, u64::from(entry.type_id));
            write_varint(&mut out, u64::from(entry.length_bucket));
            grouped
                .entry(entry.type_id)
                .or_default()
                .extend(suffix.iter().map(|b| u32::from(*b)));
        }

        let backend = RansBackend::default();
        write_varint(&mut out, grouped.len() as u64);
        for (type_id, raw) in &grouped {
            let (compressed, model) = backend.compress(raw, BYTE_ALPHABET)?;
            let model_blob = canonical_json(&model)?;
            write_varint(&mut out, u64::from(*type_id));
            write_varint(&mut out, raw.len() as u64);
            write_varint(&mut out, model_blob.len() as u64);
            out.extend_from_slice(&model_blob);
            write_varint(&mut out, compressed.len() as u64);
            out.extend_from_slice(&compressed);
        }
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ModelError> {
        Self::from_bytes_with_budget(data, &ResourceBudget::default())
    }

    pub fn from_bytes_with_budget(
        data: &[u8],
        budget: &ResourceBudget,
    ) -> Result<Self, ModelError> {
        budget.ensure_string_table(data.len())?;
        let mut offset = 0usize;
        let version = read_varint(data, &mut offset)?;
        if version != STRING_TABLE_VERSION {
            return Err(ModelError::StringTable(format!("unsupported version {}", version)));
        }
        let count = read_usize(data, &mut offset)?;
        // Each entry takes at least five bytes.
        if count > data.len() / 5 {
            return Err(ModelError::StringTable(format!("entry count {} exceeds input", count)));
        }

        let mut headers = Vec::with_capacity(count);
        for _ in 0..count {
            let prefix = read_usize(data, &mut offset)?;
            let suffix_len = read_usize(data, &mut offset)?;
            let frequency = read_varint(data, &mut offset)?;
            let type_id = read_small(data, &mut offset)?;
            let bucket = read_small(data, &mut offset)?;
            headers.push((prefix, suffix_len, frequency, type_id, bucket));
        }

        let streams = read_usize(data, &mut offset)?;
        let backend = RansBackend::default();
        let mut grouped: HashMap<u8, Vec<u8>> = HashMap::new();
        for _ in 0..streams {
            let type_id = read_small(data, &mut offset)?;
            let raw_len = read_usize(data, &mut offset)?;
            budget.ensure_string_table(raw_len)?;
            let model_blob = read_slice(data, &mut offset)?;
            let compressed = read_slice(data, &mut offset)?;
            let bytes = if raw_len == 0 {
                Vec::new()
            } else {
                budget.ensure_model(model_blob.len())?;
                let model = ModelSpec::from_json(model_blob)?;
                backend
                    .decode(compressed, &model, raw_len)?
                    .into_iter()
                    .map(|s| {
                        u8::try_from(s).map_err(|_| {
                            ModelError::StringTable("suffix symbol exceeds a byte".into())
                        })
                    })
                    .collect::<Result<Vec<u8>, _>>()?
            };
            if grouped.insert(type_id, bytes).is_some() {
                return Err(ModelError::StringTable(format!(
                    "duplicate stream for type {}",
                    type_id
                )));
            }
        }
        if offset != data.len() {
            return Err(ModelError::StringTable("trailing bytes after string table".into()));
        }

        let mut positions: HashMap<u8, usize> = HashMap::new();
        let mut entries: Vec<StringTableEntry> = Vec::with_capacity(count);
        for (prefix, suffix_len, frequency, type_id, bucket) in headers {
            let stream = grouped.get(&type_id).map(Vec::as_slice).unwrap_or(&[]);
            let position = positions.entry(type_id).or_insert(0);
            let end = position
                .checked_add(suffix_len)
                .filter(|end| *end <= stream.len())
                .ok_or_else(|| {
                    ModelError::StringTable(format!("suffix stream truncated for type {}", type_id))
                })?;
            let suffix = std::str::from_utf8(&stream[*position..end])
                .map_err(|e| ModelError::StringTable(e.to_string()))?
                .to_string();
            *position = end;

            let previous = entries.last().map(|e| e.value.as_str()).unwrap_or("");
            if prefix > previous.chars().count() {
                return Err(ModelError::StringTable(format!(
                    "prefix {} longer than previous entry",
                    prefix
                )));
            }
            let mut value: String = previous.chars().take(prefix).collect();
            value.push_str(&suffix);
            entries.push(StringTableEntry {
                value,
                frequency,
                prefix_length: prefix,
                suffix,
                type_id,
                length_bucket: bucket,
            });
        }
        Ok(Self::from_entries(entries))
    }

    /// Replace every string inside `value` with a `{"__strref__": index}` reference.
    pub fn encode_value(&self, value: &Value) -> Result<Value, ModelError> {
        Ok(match value {
            Value::String(s) => {
                let mut map = Map::new();
                map.insert(STRING_REF_KEY.to_string(), Value::from(self.index_for(s)?));
                Value::Object(map)
            }
            Value::Array(items) => Value::Array(
                items.iter().map(|v| self.encode_value(v)).collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| -> Result<(String, Value), ModelError> {
                        Ok((k.clone(), self.encode_value(v)?))
                    })
                    .collect::<Result<Map<_, _>, _>>()?,
            ),
            other => other.clone(),
        })
    }

    pub fn decode_value(&self, value: &Value) -> Result<Value, ModelError> {
        Ok(match value {
            Value::Object(map) if map.len() == 1 && map.contains_key(STRING_REF_KEY) => {
                let index = map[STRING_REF_KEY].as_u64().ok_or_else(|| {
                    ModelError::StringTable("string reference index must be an integer".into())
                })?;
                Value::String(self.string_for_index(index as usize)?.to_string())
            }
            Value::Array(items) => Value::Array(
                items.iter().map(|v| self.decode_value(v)).collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| -> Result<(String, Value), ModelError> {
                        Ok((k.clone(), self.decode_value(v)?))
                    })
                    .collect::<Result<Map<_, _>, _>>()?,
            ),
            other => other.clone(),
        })
    }
}

fn read_usize(data: &[u8], offset: &mut usize) -> Result<usize, ModelError> {
    let value = read_varint(data, offset)?;
    usize::try_from(value)
        .map_err(|_| ModelError::StringTable(format!("length {} overflows", value)))
}

fn read_small(data: &[u8], offset: &mut usize) -> Result<u8, ModelError> {
    let value = read_varint(data, offset)?;
    u8::try_from(value)
        .map_err(|_| ModelError::StringTable(format!("class id {} out of range", value)))
}

fn read_slice<'a>(data: &'a [u8], offset: &mut usize) -> Result<&'a [u8], ModelError> {
    let len = read_usize(data, offset)?;
    let end = offset
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| ModelError::StringTable("length prefix overruns input".into()))?;
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}
