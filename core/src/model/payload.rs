//! model/payload.rs
//! Payload channels aligned with the token grammar.
//!
//! Design notes:
//! - Values live in per-class channels so that similar values compress
//!   together; `entries` records the interleaving in grammar order.
//! - Identifier and string channels hold text here; they become string
//!   table indices only on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::channel_bits;
use crate::model::types::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayloadChannel {
    #[serde(rename = "I")]
    Identifier,
    #[serde(rename = "S")]
    String,
    #[serde(rename = "N")]
    Number,
    #[serde(rename = "C")]
    Count,
    #[serde(rename = "F")]
    Flag,
    #[serde(rename = "R")]
    Structured,
}

impl PayloadChannel {
    pub fn code(&self) -> char {
        match self {
            PayloadChannel::Identifier => 'I',
            PayloadChannel::String => 'S',
            PayloadChannel::Number => 'N',
            PayloadChannel::Count => 'C',
            PayloadChannel::Flag => 'F',
            PayloadChannel::Structured => 'R',
        }
    }

    pub fn bit(&self) -> u32 {
        match self {
            PayloadChannel::Identifier => channel_bits::IDENTIFIERS,
            PayloadChannel::String => channel_bits::STRINGS,
            PayloadChannel::Number => channel_bits::NUMBERS,
            PayloadChannel::Count => channel_bits::COUNTS,
            PayloadChannel::Flag => channel_bits::FLAGS,
            PayloadChannel::Structured => channel_bits::STRUCTURED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEntry {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub channel: PayloadChannel,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub token_index: Option<u32>,
}

/// A single payload value tagged with its channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
    Identifier(String),
    String(String),
    Number(i64),
    Count(u64),
    Flag(bool),
    Structured(Value),
}

impl PayloadValue {
    pub fn channel(&self) -> PayloadChannel {
        match self {
            PayloadValue::Identifier(_) => PayloadChannel::Identifier,
            PayloadValue::String(_) => PayloadChannel::String,
            PayloadValue::Number(_) => PayloadChannel::Number,
            PayloadValue::Count(_) => PayloadChannel::Count,
            PayloadValue::Flag(_) => PayloadChannel::Flag,
            PayloadValue::Structured(_) => PayloadChannel::Structured,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayloadChannels {
    pub entries: Vec<PayloadEntry>,
    pub identifiers: Vec<String>,
    pub strings: Vec<String>,
    pub numbers: Vec<i64>,
    pub counts: Vec<u64>,
    pub flags: Vec<bool>,
    pub structured: Vec<Value>,
}

impl PayloadChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        payload_type: &str,
        value: PayloadValue,
        kind: Option<&str>,
        token_index: Option<u32>,
    ) {
        self.entries.push(PayloadEntry {
            payload_type: payload_type.to_string(),
            channel: value.channel(),
            kind: kind.map(str::to_string),
            token_index,
        });
        match value {
            PayloadValue::Identifier(v) => self.identifiers.push(v),
            PayloadValue::String(v) => self.strings.push(v),
            PayloadValue::Number(v) => self.numbers.push(v),
            PayloadValue::Count(v) => self.counts.push(v),
            PayloadValue::Flag(v) => self.flags.push(v),
            PayloadValue::Structured(v) => self.structured.push(v),
        }
    }

    pub fn append_identifier(
        &mut self,
        payload_type: &str,
        value: impl Into<String>,
        token_index: Option<u32>,
    ) {
        self.append(payload_type, PayloadValue::Identifier(value.into()), None, token_index);
    }

    pub fn append_string(
        &mut self,
        payload_type: &str,
        value: impl Into<String>,
        kind: Option<&str>,
        token_index: Option<u32>,
    ) {
        self.append(payload_type, PayloadValue::String(value.into()), kind, token_index);
    }

    pub fn append_number(
        &mut self,
        payload_type: &str,
        value: i64,
        kind: Option<&str>,
        token_index: Option<u32>,
    ) {
        self.append(payload_type, PayloadValue::Number(value), kind, token_index);
    }

    pub fn append_count(&mut self, payload_type: &str, value: u64, token_index: Option<u32>) {
        self.append(payload_type, PayloadValue::Count(value), None, token_index);
    }

    pub fn append_flag(&mut self, payload_type: &str, value: bool, token_index: Option<u32>) {
        self.append(payload_type, PayloadValue::Flag(value), None, token_index);
    }

    pub fn append_structured(
        &mut self,
        payload_type: &str,
        value: Value,
        token_index: Option<u32>,
    ) {
        self.append(payload_type, PayloadValue::Structured(value), None, token_index);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bitmask of non-empty channels.
    pub fn channel_bits(&self) -> u32 {
        let mut bits = 0;
        if !self.identifiers.is_empty() {
            bits |= channel_bits::IDENTIFIERS;
        }
        if !self.strings.is_empty() {
            bits |= channel_bits::STRINGS;
        }
        if !self.numbers.is_empty() {
            bits |= channel_bits::NUMBERS;
        }
        if !self.counts.is_empty() {
            bits |= channel_bits::COUNTS;
        }
        if !self.flags.is_empty() {
            bits |= channel_bits::FLAGS;
        }
        if !self.structured.is_empty() {
            bits |= channel_bits::STRUCTURED;
        }
        bits
    }

    /// Check that the entry log and the channel vectors agree.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut per_channel = [0usize; 6];
        for entry in &self.entries {
            per_channel[entry.channel as usize] += 1;
        }
        let actual = [
            self.identifiers.len(),
            self.strings.len(),
            self.numbers.len(),
            self.counts.len(),
            self.flags.len(),
            self.structured.len(),
        ];
        if per_channel != actual {
            return Err(ModelError::Inconsistent(format!(
                "payload entries {:?} disagree with channel sizes {:?}",
                per_channel, actual
            )));
        }
        Ok(())
    }

    /// Every string that should live in the string table, including strings
    /// nested inside structured values.
    pub fn collect_strings<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.extend(self.identifiers.iter().map(String::as_str));
        out.extend(self.strings.iter().map(String::as_str));
        for value in &self.structured {
            collect_nested_strings(value, out);
        }
    }

    pub fn cursor(&self) -> PayloadCursor<'_> {
        PayloadCursor::new(self)
    }
}

fn collect_nested_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_nested_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_nested_strings(v, out)),
        _ => {}
    }
}

/// Replays channel values in grammar order, checking each request against
/// the recorded entry.
pub struct PayloadCursor<'a> {
    channels: &'a PayloadChannels,
    next_entry: usize,
    positions: [usize; 6],
}

impl<'a> PayloadCursor<'a> {
    fn new(channels: &'a PayloadChannels) -> Self {
        Self { channels, next_entry: 0, positions: [0; 6] }
    }

    fn take(
        &mut self,
        expected_type: &str,
        channel: PayloadChannel,
        kind: Option<&str>,
    ) -> Result<(&'a PayloadEntry, usize), ModelError> {
        let entry = self
            .channels
            .entries
            .get(self.next_entry)
            .ok_or(ModelError::EntriesExhausted)?;
        if entry.payload_type != expected_type {
            return Err(ModelError::UnexpectedPayload {
                expected: expected_type.to_string(),
                found: entry.payload_type.clone(),
            });
        }
        if entry.channel != channel {
            return Err(ModelError::ChannelMismatch { expected: channel, found: entry.channel });
        }
        if let (Some(expected), Some(found)) = (kind, entry.kind.as_deref()) {
            if expected != found {
                return Err(ModelError::KindMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }
        self.next_entry += 1;
        let slot = &mut self.positions[channel as usize];
        let position = *slot;
        *slot += 1;
        Ok((entry, position))
    }

    /// Type of the next entry without consuming it.
    pub fn peek_type(&self) -> Option<&'a str> {
        self.channels
            .entries
            .get(self.next_entry)
            .map(|e| e.payload_type.as_str())
    }

    pub fn identifier(&mut self, expected_type: &str) -> Result<&'a str, ModelError> {
        let (_, at) = self.take(expected_type, PayloadChannel::Identifier, None)?;
        self.channels
            .identifiers
            .get(at)
            .map(String::as_str)
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::Identifier))
    }

    /// String value plus the recorded kind, if any.
    pub fn string(
        &mut self,
        expected_type: &str,
        kind: Option<&str>,
    ) -> Result<(&'a str, Option<&'a str>), ModelError> {
        let (entry, at) = self.take(expected_type, PayloadChannel::String, kind)?;
        let value = self
            .channels
            .strings
            .get(at)
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::String))?;
        Ok((value, entry.kind.as_deref()))
    }

    pub fn number(&mut self, expected_type: &str, kind: Option<&str>) -> Result<i64, ModelError> {
        let (_, at) = self.take(expected_type, PayloadChannel::Number, kind)?;
        self.channels
            .numbers
            .get(at)
            .copied()
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::Number))
    }

    pub fn count(&mut self, expected_type: &str) -> Result<u64, ModelError> {
        let (_, at) = self.take(expected_type, PayloadChannel::Count, None)?;
        self.channels
            .counts
            .get(at)
            .copied()
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::Count))
    }

    pub fn flag(&mut self, expected_type: &str) -> Result<bool, ModelError> {
        let (_, at) = self.take(expected_type, PayloadChannel::Flag, None)?;
        self.channels
            .flags
            .get(at)
            .copied()
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::Flag))
    }

    pub fn structured(&mut self, expected_type: &str) -> Result<&'a Value, ModelError> {
        let (_, at) = self.take(expected_type, PayloadChannel::Structured, None)?;
        self.channels
            .structured
            .get(at)
            .ok_or(ModelError::ChannelExhausted(PayloadChannel::Structured))
    }

    pub fn remaining(&self) -> usize {
        self.channels.entries.len() - self.next_entry
    }

    /// Fail unless every entry has been consumed.
    pub fn finish(self) -> Result<(), ModelError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(ModelError::TrailingPayloads(n)),
        }
    }
}
