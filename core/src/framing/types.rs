use std::fmt;

use num_enum::TryFromPrimitive;

use crate::constants::section_ids;
use crate::utils::enum_name_or_hex;
use crate::versioning::Version;

bitflags::bitflags! {
    /// Optional capabilities advertised by a frame.
    ///
    /// Every bit must be understood by the reader; unknown bits are rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureFlags: u32 {
        const COMPRESSION_OPTIMISATION = 1 << 0;
        const COMPRESSION_EXTRAS       = 1 << 1;
        const PAYLOAD_SOURCE_MAP       = 1 << 2;
        const COMPRESSION_FSE          = 1 << 3;
    }
}

/// Wire names, in bit order.
const FEATURE_NAMES: &[(FeatureFlags, &str)] = &[
    (FeatureFlags::COMPRESSION_OPTIMISATION, "compression:optimisation"),
    (FeatureFlags::COMPRESSION_EXTRAS, "compression:extras"),
    (FeatureFlags::PAYLOAD_SOURCE_MAP, "payload:source-map"),
    (FeatureFlags::COMPRESSION_FSE, "compression:fse"),
];

impl FeatureFlags {
    /// Decode a raw bitset, failing on any bit this reader does not know.
    pub fn from_wire(raw: u32) -> Result<Self, FrameError> {
        let unknown = raw & !Self::all().bits();
        if unknown != 0 {
            return Err(FrameError::UnknownFeatureBits(unknown));
        }
        Ok(Self::from_bits_retain(raw))
    }

    pub fn from_wire_name(name: &str) -> Result<Self, FrameError> {
        FEATURE_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(flag, _)| *flag)
            .ok_or_else(|| FrameError::UnknownFeatureName(name.to_string()))
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Self::empty();
        for name in names {
            flags |= Self::from_wire_name(name.as_ref())?;
        }
        Ok(flags)
    }

    /// Feature names, sorted lexicographically.
    pub fn names(&self) -> Vec<String> {
        let mut out: Vec<String> = FEATURE_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| (*name).to_string())
            .collect();
        out.sort();
        out
    }
}

/// Fixed frame header.
///
/// Version, features and body length are big-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: [u8; 4],
    pub version: Version,
    pub features: FeatureFlags,
    pub body_len: u32,
}

impl FrameHeader {
    pub const LEN: usize = 4 // magic
        + 1                  // major
        + 1                  // minor
        + 2                  // patch
        + 4                  // feature bits
        + 4;                 // body_len

    /// CRC-32 of the body, appended after it.
    pub const TRAILER_LEN: usize = 4;
}

/// Borrowed view of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView<'a> {
    pub header: FrameHeader,
    pub body: &'a [u8],
}

/// Section identifiers inside a payload frame body.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
pub enum SectionId {
    StreamHeader       = section_ids::STREAM_HEADER,
    Compression        = section_ids::COMPRESSION,
    Tokens             = section_ids::TOKENS,
    StringTable        = section_ids::STRING_TABLE,
    PayloadRecord      = section_ids::PAYLOAD_RECORD,
    SourceMap          = section_ids::SOURCE_MAP,
    Metadata           = section_ids::METADATA,
    ChannelIdentifiers = section_ids::CHANNEL_IDENTIFIERS,
    ChannelStrings     = section_ids::CHANNEL_STRINGS,
    ChannelNumbers     = section_ids::CHANNEL_NUMBERS,
    ChannelCounts      = section_ids::CHANNEL_COUNTS,
    ChannelFlags       = section_ids::CHANNEL_FLAGS,
}

impl SectionId {
    pub fn verify(raw: u16) -> Result<Self, FrameError> {
        SectionId::try_from(raw).map_err(|_| FrameError::UnknownSection(raw))
    }
}

/// Owned section record, as produced by the package assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub flags: u16,
    pub payload: Vec<u8>,
}

impl Section {
    pub const HEADER_LEN: usize = 2 // id
        + 2                         // flags
        + 4;                        // length

    pub fn new(id: SectionId, payload: Vec<u8>) -> Self {
        Self { id, flags: 0, payload }
    }

    pub fn with_flags(id: SectionId, flags: u16, payload: Vec<u8>) -> Self {
        Self { id, flags, payload }
    }
}

/// Borrowed section, as yielded by `decode_sections`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionView<'a> {
    pub id: SectionId,
    pub flags: u16,
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },
    Truncated { needed: usize, available: usize },
    UnknownFeatureBits(u32),
    UnknownFeatureName(String),
    ChecksumMismatch { expected: u32, actual: u32 },
    BodyTooLarge(usize),
    UnknownSection(u16),
    DuplicateSection(u16),
    Malformed(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FrameError::*;
        match self {
            InvalidMagic { expected, found } =>
                write!(f, "invalid frame magic: expected {:?}, found {:?}", expected, found),
            Truncated { needed, available } =>
                write!(f, "truncated frame: need {} bytes, have {}", needed, available),
            UnknownFeatureBits(bits) =>
                write!(f, "frame advertises unknown feature bits: 0x{:08x}", bits),
            UnknownFeatureName(name) =>
                write!(f, "unknown feature name: {}", name),
            ChecksumMismatch { expected, actual } =>
                write!(
                    f,
                    "frame checksum mismatch: expected 0x{:08x}, got 0x{:08x}",
                    expected, actual
                ),
            BodyTooLarge(len) =>
                write!(f, "frame body too large: {} bytes", len),
            UnknownSection(raw) =>
                write!(f, "unknown section id: {}", enum_name_or_hex::<SectionId>(*raw)),
            DuplicateSection(raw) =>
                write!(f, "duplicate section: {}", enum_name_or_hex::<SectionId>(*raw)),
            Malformed(msg) =>
                write!(f, "malformed frame: {}", msg),
        }
    }
}

impl std::error::Error for FrameError {}
