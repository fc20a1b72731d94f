// Frame and section codec:

// * `write_frame` / `read_frame` / `parse_frame_header`
// * `encode_sections` / `decode_sections` / `index_sections`
// * feature bit validation

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use qyn1_core::constants::{PAYLOAD_MAGIC, WRAPPER_MAGIC};
    use qyn1_core::framing::{
        decode_sections, encode_sections, index_sections, parse_frame_header, read_frame,
        write_frame, FeatureFlags, FrameError, FrameHeader, Section, SectionId,
    };
    use qyn1_core::versioning::Version;

    fn v120() -> Version {
        Version::new(1, 2, 0)
    }

// # ✅ 1. Frame roundtrip with empty remainder

    #[test]
    fn frame_roundtrip() {
        let features = FeatureFlags::COMPRESSION_EXTRAS | FeatureFlags::PAYLOAD_SOURCE_MAP;
        let wire = write_frame(WRAPPER_MAGIC, v120(), features, b"hello body").unwrap();
        assert_eq!(wire.len(), FrameHeader::LEN + 10 + FrameHeader::TRAILER_LEN);

        let (frame, rest) = read_frame(&wire, WRAPPER_MAGIC).unwrap();
        assert!(rest.is_empty());
        assert_eq!(frame.header.version, v120());
        assert_eq!(frame.header.features, features);
        assert_eq!(frame.body, b"hello body");
    }

// # ✅ 2. Header layout is big-endian

    #[test]
    fn header_layout_is_pinned() {
        let version = Version::new(1, 1, 258);
        let wire = write_frame(PAYLOAD_MAGIC, version, FeatureFlags::COMPRESSION_FSE, b"").unwrap();
        assert_eq!(&wire[0..4], b"MCS\0");
        assert_eq!(wire[4], 1);
        assert_eq!(wire[5], 1);
        assert_eq!(&wire[6..8], &[0x01, 0x02]);
        assert_eq!(&wire[8..12], &[0, 0, 0, 0x08]);
        assert_eq!(&wire[12..16], &[0, 0, 0, 0]);
    }

// # ✅ 3. Remainder is returned to the caller

    #[test]
    fn trailing_bytes_are_returned() {
        let mut wire = write_frame(WRAPPER_MAGIC, v120(), FeatureFlags::empty(), b"abc").unwrap();
        wire.extend_from_slice(b"tail");
        let (_, rest) = read_frame(&wire, WRAPPER_MAGIC).unwrap();
        assert_eq!(rest, b"tail");
    }

// # ❌ 4. Wrong magic is rejected

    #[test]
    fn wrong_magic_is_rejected() {
        let wire = write_frame(WRAPPER_MAGIC, v120(), FeatureFlags::empty(), b"abc").unwrap();
        assert!(matches!(
            read_frame(&wire, PAYLOAD_MAGIC),
            Err(FrameError::InvalidMagic { .. })
        ));
    }

// # ❌ 5. Unknown feature bits are rejected

    #[test]
    fn unknown_feature_bits_are_rejected() {
        let mut wire = write_frame(WRAPPER_MAGIC, v120(), FeatureFlags::empty(), b"abc").unwrap();
        wire[11] = 0x10;
        assert!(matches!(
            parse_frame_header(&wire, WRAPPER_MAGIC),
            Err(FrameError::UnknownFeatureBits(0x10))
        ));
    }

// # ❌ 6. Body corruption fails the checksum

    #[test]
    fn corrupted_body_fails_crc() {
        let mut wire =
            write_frame(WRAPPER_MAGIC, v120(), FeatureFlags::empty(), b"abcdef").unwrap();
        wire[FrameHeader::LEN + 2] ^= 0x01;
        assert!(matches!(
            read_frame(&wire, WRAPPER_MAGIC),
            Err(FrameError::ChecksumMismatch { .. })
        ));
    }

// # ❌ 7. Truncation is rejected

    #[test]
    fn truncated_frames_are_rejected() {
        let wire = write_frame(WRAPPER_MAGIC, v120(), FeatureFlags::empty(), b"abcdef").unwrap();
        for cut in [0, 5, FrameHeader::LEN, wire.len() - 1] {
            assert!(matches!(
                read_frame(&wire[..cut], WRAPPER_MAGIC),
                Err(FrameError::Truncated { .. })
            ));
        }
    }

// # ✅ 8. Feature names are sorted and reversible

    #[test]
    fn feature_names_roundtrip() {
        let flags = FeatureFlags::all();
        let names = flags.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(FeatureFlags::from_names(&names).unwrap(), flags);
        assert!(matches!(
            FeatureFlags::from_wire_name("compression:zstd"),
            Err(FrameError::UnknownFeatureName(_))
        ));
    }

// # ✅ 9. Sections keep wire order and flags

    #[test]
    fn sections_roundtrip() {
        let sections = vec![
            Section::with_flags(SectionId::StreamHeader, 0x0001, b"head".to_vec()),
            Section::new(SectionId::Compression, b"model".to_vec()),
            Section::new(SectionId::Metadata, Vec::new()),
        ];
        let body = encode_sections(&sections).unwrap();
        let views = decode_sections(&body).unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].id, SectionId::StreamHeader);
        assert_eq!(views[0].flags, 0x0001);
        assert_eq!(views[1].payload, b"model");
        assert!(views[2].payload.is_empty());

        let map = index_sections(views).unwrap();
        assert_eq!(map[&SectionId::Compression].payload, b"model");
    }

// # ❌ 10. Duplicate and unknown section ids fail

    #[test]
    fn duplicate_sections_are_rejected() {
        let sections = vec![
            Section::new(SectionId::Tokens, b"a".to_vec()),
            Section::new(SectionId::Tokens, b"b".to_vec()),
        ];
        let body = encode_sections(&sections).unwrap();
        assert!(matches!(
            index_sections(decode_sections(&body).unwrap()),
            Err(FrameError::DuplicateSection(0x0003))
        ));
    }

    #[test]
    fn unknown_section_id_is_rejected() {
        let body = [0x99u8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(decode_sections(&body), Err(FrameError::UnknownSection(0x0099))));
    }

    #[test]
    fn overlong_section_is_rejected() {
        let mut body =
            encode_sections(&[Section::new(SectionId::Tokens, b"abcd".to_vec())]).unwrap();
        body.truncate(body.len() - 1);
        assert!(matches!(decode_sections(&body), Err(FrameError::Truncated { .. })));
    }

// # ✅ 11. Property: any body survives a frame roundtrip

    proptest! {
        #[test]
        fn prop_frame_roundtrip(
            body in proptest::collection::vec(any::<u8>(), 0..2048),
            bits in 0u32..16,
        ) {
            let features = FeatureFlags::from_wire(bits).unwrap();
            let wire = write_frame(PAYLOAD_MAGIC, v120(), features, &body).unwrap();
            let (frame, rest) = read_frame(&wire, PAYLOAD_MAGIC).unwrap();
            prop_assert!(rest.is_empty());
            prop_assert_eq!(frame.body, &body[..]);
            prop_assert_eq!(frame.header.features, features);
        }
    }
}
