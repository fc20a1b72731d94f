//! Wire framing for QYN1 packages.
//!
//! Responsibilities:
//! - Frame: magic + version + feature bitset + length-delimited body + CRC
//! - Sections: typed, length-prefixed records inside a payload frame body
//! - Strict validation of both on read
//!
//! Non-responsibilities:
//! - Cryptography
//! - Section payload semantics (see `package`)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FeatureFlags,
    FrameError,
    FrameHeader,
    FrameView,
    Section,
    SectionId,
    SectionView,
};
pub use encode::{encode_sections, write_frame};
pub use decode::{decode_sections, index_sections, parse_frame_header, read_frame};
