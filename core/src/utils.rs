//! utils.rs
//! Small shared helpers: checksums, digests, canonical JSON, varints, base64.
//!
//! Design notes:
//! - Canonical JSON is produced in exactly one place so AAD, model digests and
//!   the wrapper body can never drift apart.
//! - Varints are unsigned LEB128; signed values go through zigzag first.

use std::fmt;
use std::io;

use base64::{engine::general_purpose::STANDARD, Engine};
use num_enum::TryFromPrimitive;
use serde::Serialize;
use sha2::{Digest as _, Sha256};

pub fn compute_crc32(data: &[u8]) -> u32 {
    use crc32fast::Hasher;
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_slice());
    out
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

pub fn b64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub fn b64_decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text)
}

// -----------------------------------------------------------------------------
// Canonical JSON
// -----------------------------------------------------------------------------

/// Compact formatter that escapes every non-ASCII scalar as `\uXXXX`
/// (lowercase hex, surrogate pairs above the BMP).
struct AsciiFormatter;

impl serde_json::ser::Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` as canonical JSON: sorted keys, `,`/`:` separators,
/// no whitespace, ASCII-only output.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    // Going through `Value` sorts object keys (BTreeMap-backed map).
    let value = serde_json::to_value(value)?;
    let mut out = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    value.serialize(&mut ser)?;
    Ok(out)
}

// -----------------------------------------------------------------------------
// Varints
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarintError {
    Unterminated,
    Overflow,
}

impl fmt::Display for VarintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarintError::Unterminated => write!(f, "unterminated varint sequence"),
            VarintError::Overflow => write!(f, "varint is too large"),
        }
    }
}

impl std::error::Error for VarintError {}

pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Read one varint starting at `*offset`, advancing the offset past it.
pub fn read_varint(buf: &[u8], offset: &mut usize) -> Result<u64, VarintError> {
    let mut shift = 0u32;
    let mut result = 0u64;
    loop {
        let byte = *buf.get(*offset).ok_or(VarintError::Unterminated)?;
        *offset += 1;
        if shift > 63 || (shift == 63 && (byte & 0x7F) > 1) {
            return Err(VarintError::Overflow);
        }
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
