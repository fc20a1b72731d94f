// Token stream model:

// * string table ordering, wire form and structured references
// * payload channels and the replay cursor
// * source maps and stream validation
// * varint and canonical JSON helpers

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use qyn1_core::constants::channel_bits;
    use qyn1_core::model::string_table::{classify_string, length_bucket};
    use qyn1_core::model::{
        ModelError, PayloadChannel, PayloadChannels, SourceMap, SourceMapBuilder, Span, StringTable,
        TokenStream,
    };
    use qyn1_core::utils::{
        canonical_json, read_varint, sha256_hex, write_varint, zigzag_decode, zigzag_encode,
        VarintError,
    };
    use serde_json::json;

    fn sample_table() -> StringTable {
        StringTable::build(["b", "a", "b", "ab", "c", "b", "a"])
    }

// # ✅ 1. String table ordering and prefixes

    #[test]
    fn build_orders_by_frequency_then_value() {
        let table = sample_table();
        let values: Vec<&str> = table.entries().iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["b", "a", "ab", "c"]);
        let freqs: Vec<u64> = table.entries().iter().map(|e| e.frequency).collect();
        assert_eq!(freqs, vec![3, 2, 1, 1]);
        assert_eq!(table.index_for("b").unwrap(), 0);
        assert_eq!(table.string_for_index(2).unwrap(), "ab");
    }

    #[test]
    fn prefixes_share_with_previous_entry() {
        let table = sample_table();
        let ab = &table.entries()[2];
        assert_eq!(ab.prefix_length, 1);
        assert_eq!(ab.suffix, "b");
        assert_eq!(table.entries()[0].prefix_length, 0);
    }

    #[test]
    fn lookups_report_missing_and_out_of_range() {
        let table = sample_table();
        assert!(matches!(table.index_for("zzz"), Err(ModelError::MissingString(_))));
        assert!(matches!(
            table.string_for_index(9),
            Err(ModelError::StringIndex { index: 9, size: 4 })
        ));
    }

    #[test]
    fn classification_and_length_buckets() {
        assert_eq!(classify_string(""), 0);
        assert_eq!(classify_string("foo_bar1"), 1);
        assert_eq!(classify_string("src/main.rs"), 2);
        assert_eq!(classify_string("https://example.org"), 2);
        assert_eq!(classify_string("Hello, world"), 3);
        assert_eq!(classify_string("SELECT * FROM t"), 4);
        assert_eq!(classify_string("a-b"), 0);

        assert_eq!(length_bucket(""), 0);
        assert_eq!(length_bucket("abcdefgh"), 0);
        assert_eq!(length_bucket("abcdefghi"), 1);
        assert_eq!(length_bucket(&"x".repeat(33)), 2);
        assert_eq!(length_bucket(&"x".repeat(129)), 3);
    }

// # ✅ 2. String table wire form

    #[test]
    fn string_table_bytes_roundtrip() {
        let table = StringTable::build([
            "alpha", "alphabet", "alpha", "héllo wörld!", "path/to/file", "", "SELECT 1", "x",
        ]);
        let bytes = table.to_bytes().unwrap();
        let decoded = StringTable::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(
            decoded.index_for("héllo wörld!").unwrap(),
            table.index_for("héllo wörld!").unwrap()
        );
    }

    #[test]
    fn empty_string_table_roundtrips() {
        let table = StringTable::build(std::iter::empty::<&str>());
        assert!(table.is_empty());
        let decoded = StringTable::from_bytes(&table.to_bytes().unwrap()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn string_table_rejects_trailing_bytes_and_bad_version() {
        let mut bytes = sample_table().to_bytes().unwrap();
        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(StringTable::from_bytes(&trailing), Err(ModelError::StringTable(_))));

        bytes[0] = 2;
        assert!(matches!(StringTable::from_bytes(&bytes), Err(ModelError::StringTable(_))));
    }

// # ✅ 3. Structured values use string references

    #[test]
    fn encode_value_replaces_nested_strings() {
        let table = StringTable::build(["x", "y"]);
        let value = json!({"k": ["x", 1, {"n": "y"}], "t": true});
        let encoded = table.encode_value(&value).unwrap();
        assert_eq!(
            encoded,
            json!({"k": [{"__strref__": 0}, 1, {"n": {"__strref__": 1}}], "t": true})
        );
        assert_eq!(table.decode_value(&encoded).unwrap(), value);
    }

    #[test]
    fn encode_value_requires_every_string() {
        let table = StringTable::build(["x"]);
        assert!(matches!(
            table.encode_value(&json!(["x", "q"])),
            Err(ModelError::MissingString(_))
        ));
        assert!(table.decode_value(&json!({"__strref__": 5})).is_err());
        assert!(table.decode_value(&json!({"__strref__": "0"})).is_err());
    }

// # ✅ 4. Payload channels and cursor

    fn sample_payloads() -> PayloadChannels {
        let mut p = PayloadChannels::new();
        p.append_identifier("name", "foo", Some(3));
        p.append_number("const", 42, Some("int"), Some(4));
        p.append_string("const", "hi", Some("str"), Some(5));
        p.append_count("arity", 2, None);
        p.append_flag("async", false, None);
        p.append_structured("const", json!({"v": "nested"}), None);
        p
    }

    #[test]
    fn channel_bits_track_non_empty_channels() {
        let p = sample_payloads();
        assert_eq!(
            p.channel_bits(),
            channel_bits::IDENTIFIERS
                | channel_bits::STRINGS
                | channel_bits::NUMBERS
                | channel_bits::COUNTS
                | channel_bits::FLAGS
                | channel_bits::STRUCTURED
        );
        let mut only_numbers = PayloadChannels::new();
        only_numbers.append_number("const", -1, None, None);
        assert_eq!(only_numbers.channel_bits(), channel_bits::NUMBERS);
        assert_eq!(PayloadChannels::new().channel_bits(), 0);
        assert_eq!(PayloadChannel::Flag.bit(), channel_bits::FLAGS);
        assert_eq!(PayloadChannel::Structured.code(), 'R');
    }

    #[test]
    fn cursor_replays_in_grammar_order() {
        let p = sample_payloads();
        let mut cursor = p.cursor();
        assert_eq!(cursor.peek_type(), Some("name"));
        assert_eq!(cursor.identifier("name").unwrap(), "foo");
        assert_eq!(cursor.number("const", Some("int")).unwrap(), 42);
        assert_eq!(cursor.string("const", None).unwrap(), ("hi", Some("str")));
        assert_eq!(cursor.count("arity").unwrap(), 2);
        assert!(!cursor.flag("async").unwrap());
        assert_eq!(cursor.structured("const").unwrap(), &json!({"v": "nested"}));
        assert_eq!(cursor.remaining(), 0);
        cursor.finish().unwrap();
    }

    #[test]
    fn cursor_rejects_mismatches() {
        let p = sample_payloads();

        let mut cursor = p.cursor();
        assert!(matches!(cursor.identifier("attr"), Err(ModelError::UnexpectedPayload { .. })));

        let mut cursor = p.cursor();
        assert!(matches!(cursor.number("name", None), Err(ModelError::ChannelMismatch { .. })));

        let mut cursor = p.cursor();
        cursor.identifier("name").unwrap();
        assert!(matches!(
            cursor.number("const", Some("float")),
            Err(ModelError::KindMismatch { .. })
        ));

        let mut cursor = p.cursor();
        cursor.identifier("name").unwrap();
        assert!(matches!(cursor.finish(), Err(ModelError::TrailingPayloads(5))));

        let empty = PayloadChannels::new();
        assert!(matches!(empty.cursor().flag("async"), Err(ModelError::EntriesExhausted)));
    }

    #[test]
    fn validate_detects_inconsistent_channels() {
        let mut p = sample_payloads();
        p.validate().unwrap();
        p.numbers.push(7);
        assert!(matches!(p.validate(), Err(ModelError::Inconsistent(_))));
    }

    #[test]
    fn collect_strings_includes_nested_values() {
        let p = sample_payloads();
        let mut out = Vec::new();
        p.collect_strings(&mut out);
        assert_eq!(out, vec!["foo", "hi", "nested"]);
    }

// # ✅ 5. Source maps and stream validation

    fn sample_map(count: u32) -> SourceMap {
        let mut builder = SourceMapBuilder::new();
        for i in 0..count {
            let node = if i == 0 { None } else { Some("FunctionDef") };
            let span = node.map(|_| Span::new((i, 0), (i, 4)));
            builder.record(i, "construct:function", node, span);
        }
        builder.build(&sha256_hex(b"src"), "1.0", "1.0.0")
    }

    #[test]
    fn source_map_bytes_roundtrip() {
        let map = sample_map(3);
        assert_eq!(map.mappings[0].node, "synthetic");
        assert_eq!(map.mappings[0].start, (0, 0));
        assert_eq!(map.mappings[1].start, (1, 0));
        assert_eq!(map.mappings[2].end, (2, 4));
        let bytes = map.to_bytes().unwrap();
        assert_eq!(SourceMap::from_bytes(&bytes, 1 << 20).unwrap(), map);
    }

    #[test]
    fn source_map_inflation_is_bounded() {
        let bytes = sample_map(50).to_bytes().unwrap();
        assert!(matches!(SourceMap::from_bytes(&bytes, 64), Err(ModelError::SourceMap(_))));
        assert!(SourceMap::from_bytes(b"not zlib", 1024).is_err());
    }

    #[test]
    fn stream_validate_checks_source_map_length() {
        let mut stream = TokenStream::new("1.0", "python", "3.11").with_source(b"pass\n");
        assert_eq!(stream.source_hash.len(), 64);
        stream.tokens = vec![0, 1];
        stream.validate().unwrap();

        stream.source_map = Some(sample_map(1));
        assert!(matches!(
            stream.validate(),
            Err(ModelError::SourceMapLength { tokens: 2, mappings: 1 })
        ));
        stream.source_map = Some(sample_map(2));
        stream.validate().unwrap();
        assert_eq!(stream.symbol_count(), 2);
    }

// # ✅ 6. Varints and canonical JSON

    #[test]
    fn varint_errors() {
        let mut offset = 0;
        assert_eq!(read_varint(&[0x80], &mut offset), Err(VarintError::Unterminated));
        let mut offset = 0;
        assert_eq!(read_varint(&[0xFF; 11], &mut offset), Err(VarintError::Overflow));
    }

    #[test]
    fn canonical_json_sorts_keys_and_escapes() {
        let value = json!({"b": 1, "a": "é", "c": [1, "😀"]});
        let out = canonical_json(&value).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"a":"\u00e9","b":1,"c":[1,"\ud83d\ude00"]}"#
        );
    }

    proptest! {
        #[test]
        fn prop_varint_roundtrip(values in proptest::collection::vec(any::<u64>(), 0..64)) {
            let mut buf = Vec::new();
            for v in &values {
                write_varint(&mut buf, *v);
            }
            let mut offset = 0;
            let mut decoded = Vec::new();
            while offset < buf.len() {
                decoded.push(read_varint(&buf, &mut offset).unwrap());
            }
            prop_assert_eq!(decoded, values);
        }

        #[test]
        fn prop_zigzag_inverse(v in any::<i64>()) {
            prop_assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }
}
