use byteorder::{LittleEndian, WriteBytesExt};

use crate::framing::types::{FeatureFlags, FrameError, FrameHeader, Section};
use crate::utils::compute_crc32;
use crate::versioning::Version;

/// Encode a frame into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ magic (4) ]
/// [ major (1) ][ minor (1) ][ patch (2, BE) ]
/// [ feature_bits (4, BE) ]
/// [ body_len (4, BE) ]
/// [ body (N) ]
/// [ crc32(body) (4, BE) ]
/// ```
pub fn write_frame(
    magic: [u8; 4],
    version: Version,
    features: FeatureFlags,
    body: &[u8],
) -> Result<Vec<u8>, FrameError> {
    let body_len = u32::try_from(body.len()).map_err(|_| FrameError::BodyTooLarge(body.len()))?;
    let expected = FrameHeader::LEN + body.len() + FrameHeader::TRAILER_LEN;
    let mut out = Vec::with_capacity(expected);

    // --- Header ---
    out.extend_from_slice(&magic);
    out.push(version.major);
    out.push(version.minor);
    out.extend_from_slice(&version.patch.to_be_bytes());
    out.extend_from_slice(&features.bits().to_be_bytes());
    out.extend_from_slice(&body_len.to_be_bytes());

    // --- Body + trailer ---
    out.extend_from_slice(body);
    out.extend_from_slice(&compute_crc32(body).to_be_bytes());

    if out.len() != expected {
        return Err(FrameError::Malformed(format!(
            "encoded frame length {} != {}",
            out.len(),
            expected
        )));
    }

    Ok(out)
}

/// Concatenate sections in the order given.
///
/// Record layout: `[ id u16 LE ][ flags u16 LE ][ len u32 LE ][ payload ]`.
/// Callers are responsible for canonical ordering.
pub fn encode_sections(sections: &[Section]) -> Result<Vec<u8>, FrameError> {
    let total: usize = sections
        .iter()
        .map(|s| Section::HEADER_LEN + s.payload.len())
        .sum();
    let mut out = Vec::with_capacity(total);

    for section in sections {
        let len = u32::try_from(section.payload.len())
            .map_err(|_| FrameError::BodyTooLarge(section.payload.len()))?;
        out.write_u16::<LittleEndian>(section.id as u16)
            .map_err(|e| FrameError::Malformed(e.to_string()))?;
        out.write_u16::<LittleEndian>(section.flags)
            .map_err(|e| FrameError::Malformed(e.to_string()))?;
        out.write_u32::<LittleEndian>(len)
            .map_err(|e| FrameError::Malformed(e.to_string()))?;
        out.extend_from_slice(&section.payload);
    }

    Ok(out)
}
