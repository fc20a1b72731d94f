
/// Magic for the outer wrapper frame.
/// "QYN1" = QYN-1 package wrapper
// Protocol magic fields are `[u8; 4]` so the type itself enforces "exactly 4 bytes".
pub const WRAPPER_MAGIC: [u8; 4] = *b"QYN1";

/// Magic for the inner (encrypted) payload frame.
/// "MCS\0" = morphemic compressed stream
pub const PAYLOAD_MAGIC: [u8; 4] = *b"MCS\0";

/// Encoder identity recorded in every stream header.
pub const ENCODER_VERSION: &str = "1.0";

/// Payload record layout identifier.
pub const ENCODING_VERSION: &str = "qyn1.1-multi-channel";

/// Prefix bound in front of the canonical metadata JSON to form the AEAD associated data.
pub const METADATA_AAD_PREFIX: &[u8] = b"QYN1-METADATA-v1:";

/// Envelope format version written into the wrapper JSON.
pub const ENCRYPTION_VERSION: u32 = 2;

/// HKDF info label for the envelope key schedule.
pub const HKDF_INFO: &[u8] = b"qyn1-envelope:v2";

/// Salt, nonce, key and tag sizes for the envelope.
pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;
pub const TAG_LEN: usize = 16;

/// Argon2id defaults (memory in KiB).
pub const KDF_TIME_COST: u32 = 4;
pub const KDF_MEMORY_COST: u32 = 65_536;
pub const KDF_PARALLELISM: u32 = 4;
pub const KDF_HASH_LEN: u32 = 32;

/// Upper bounds applied to KDF parameters read back from a wrapper.
pub const KDF_MAX_MEMORY_COST: u32 = 1024 * 1024;
pub const KDF_MAX_TIME_COST: u32 = 64;
pub const KDF_MAX_PARALLELISM: u32 = 64;

/// Reserved dictionary key used for non-strict fallbacks.
pub const UNKNOWN_MORPHEME_KEY: &str = "meta:unknown";

/// Section identifiers (mirrored in framing::SectionId).
pub mod section_ids {
    pub const STREAM_HEADER: u16 = 0x0001;
    pub const COMPRESSION: u16 = 0x0002;
    pub const TOKENS: u16 = 0x0003;
    pub const STRING_TABLE: u16 = 0x0004;
    pub const PAYLOAD_RECORD: u16 = 0x0005;
    pub const SOURCE_MAP: u16 = 0x0006;
    pub const METADATA: u16 = 0x0007;

    pub const CHANNEL_IDENTIFIERS: u16 = 0x0101;
    pub const CHANNEL_STRINGS: u16 = 0x0102;
    pub const CHANNEL_NUMBERS: u16 = 0x0103;
    pub const CHANNEL_COUNTS: u16 = 0x0104;
    pub const CHANNEL_FLAGS: u16 = 0x0105;
}

/// Stream header section flags.
pub mod stream_flags {
    pub const HAS_SOURCE_MAP: u16 = 0x0001;
}

/// Bitmask of channels present in the payload record.
pub mod channel_bits {
    pub const IDENTIFIERS: u32 = 0x01;
    pub const STRINGS: u32 = 0x02;
    pub const NUMBERS: u32 = 0x04;
    pub const COUNTS: u32 = 0x08;
    pub const FLAGS: u32 = 0x10;
    pub const STRUCTURED: u32 = 0x20;
}

/// Source hash algorithm identifiers carried by the stream header.
pub mod hash_ids {
    pub const SHA256: u8 = 0;
}

/// Default rANS precision.
pub const DEFAULT_PRECISION_BITS: u32 = 12;
pub const MIN_PRECISION_BITS: u32 = 8;
pub const MAX_PRECISION_BITS: u32 = 16;
