use std::collections::BTreeMap;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::framing::types::{
    FeatureFlags, FrameError, FrameHeader, FrameView, SectionId, SectionView, Section,
};
use crate::utils::compute_crc32;
use crate::versioning::Version;

#[inline]
pub fn parse_frame_header(wire: &[u8], expected_magic: [u8; 4]) -> Result<FrameHeader, FrameError> {
    if wire.len() < FrameHeader::LEN {
        return Err(FrameError::Truncated {
            needed: FrameHeader::LEN,
            available: wire.len(),
        });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&wire[0..4]);
    if magic != expected_magic {
        return Err(FrameError::InvalidMagic {
            expected: expected_magic,
            found: magic,
        });
    }

    let version = Version::new(wire[4], wire[5], BigEndian::read_u16(&wire[6..8]));
    let features = FeatureFlags::from_wire(BigEndian::read_u32(&wire[8..12]))?;
    let body_len = BigEndian::read_u32(&wire[12..16]);

    Ok(FrameHeader {
        magic,
        version,
        features,
        body_len,
    })
}

/// Decode one frame from the front of `wire`.
///
/// Returns the frame and whatever bytes follow it; top-level callers
/// require the remainder to be empty.
pub fn read_frame(
    wire: &[u8],
    expected_magic: [u8; 4],
) -> Result<(FrameView<'_>, &[u8]), FrameError> {
    let header = parse_frame_header(wire, expected_magic)?;

    let body_end = FrameHeader::LEN + header.body_len as usize;
    let frame_end = body_end + FrameHeader::TRAILER_LEN;
    if wire.len() < frame_end {
        return Err(FrameError::Truncated {
            needed: frame_end,
            available: wire.len(),
        });
    }

    let body = &wire[FrameHeader::LEN..body_end];
    let expected = BigEndian::read_u32(&wire[body_end..frame_end]);
    let actual = compute_crc32(body);
    if expected != actual {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }

    Ok((FrameView { header, body }, &wire[frame_end..]))
}

/// Split a payload frame body into section records, in wire order.
pub fn decode_sections(body: &[u8]) -> Result<Vec<SectionView<'_>>, FrameError> {
    let mut out = Vec::new();
    let mut off = 0usize;

    while off < body.len() {
        let remaining = body.len() - off;
        if remaining < Section::HEADER_LEN {
            return Err(FrameError::Truncated {
                needed: Section::HEADER_LEN,
                available: remaining,
            });
        }
        let raw_id = LittleEndian::read_u16(&body[off..off + 2]);
        let flags = LittleEndian::read_u16(&body[off + 2..off + 4]);
        let len = LittleEndian::read_u32(&body[off + 4..off + 8]) as usize;
        off += Section::HEADER_LEN;

        if len > body.len() - off {
            return Err(FrameError::Truncated {
                needed: len,
                available: body.len() - off,
            });
        }
        let id = SectionId::verify(raw_id)?;
        out.push(SectionView {
            id,
            flags,
            payload: &body[off..off + len],
        });
        off += len;
    }

    Ok(out)
}

/// Key sections by identifier; order on the wire is not significant here.
pub fn index_sections<'a>(
    sections: Vec<SectionView<'a>>,
) -> Result<BTreeMap<SectionId, SectionView<'a>>, FrameError> {
    let mut map = BTreeMap::new();
    for section in sections {
        if map.insert(section.id, section).is_some() {
            return Err(FrameError::DuplicateSection(section.id as u16));
        }
    }
    Ok(map)
}
