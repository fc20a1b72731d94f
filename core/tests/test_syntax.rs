// Construct tree encoding:

// * token sequence and payloads for a small function
// * decoder inverse over every node kind
// * strict and lenient handling of missing dictionary keys
// * source map alignment and decoder error paths

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qyn1_core::dictionary::{
        builtin_schema, DictionaryError, DictionaryRegistry, MorphemeDictionary,
    };
    use qyn1_core::model::TokenStream;
    use qyn1_core::syntax::{
        keys, BinaryOperator, Node, ParsedSource, SourceFrontEnd, Span, SpanTable, StreamDecoder,
        StreamEncoder, SyntaxError,
    };
    use serde_json::json;

    const ADD_SOURCE: &str = "def add(a, b):\n    return a + b\n";

    /// Front end that only knows a handful of fixed snippets.
    struct FixtureFrontEnd;

    impl SourceFrontEnd for FixtureFrontEnd {
        fn language(&self) -> &str {
            "python"
        }

        fn language_version(&self) -> &str {
            "3.11"
        }

        fn parse(&self, source: &str) -> Result<Node, SyntaxError> {
            match source {
                ADD_SOURCE => Ok(add_tree()),
                "" => Ok(Node::Module { body: Vec::new() }),
                other => Err(SyntaxError::Parse(format!("unsupported fixture: {:?}", other))),
            }
        }

        fn parse_with_spans(&self, source: &str) -> Result<ParsedSource, SyntaxError> {
            let tree = self.parse(source)?;
            let mut spans = SpanTable::new();
            if source == ADD_SOURCE {
                for (index, span) in add_spans().into_iter().enumerate() {
                    spans.insert(index, span);
                }
            }
            Ok(ParsedSource { tree, spans })
        }
    }

    /// Pre-order spans for `add_tree`: module, def, return, a + b, a, b.
    fn add_spans() -> Vec<Span> {
        vec![
            Span::new((1, 0), (2, 16)),
            Span::new((1, 0), (2, 16)),
            Span::new((2, 4), (2, 16)),
            Span::new((2, 11), (2, 16)),
            Span::new((2, 11), (2, 12)),
            Span::new((2, 15), (2, 16)),
        ]
    }

    fn add_tree() -> Node {
        Node::Module {
            body: vec![Node::FunctionDef {
                name: "add".into(),
                is_async: false,
                params: vec!["a".into(), "b".into()],
                body: vec![Node::Return {
                    value: Some(Box::new(Node::binop(
                        BinaryOperator::Add,
                        Node::name("a"),
                        Node::name("b"),
                    ))),
                }],
            }],
        }
    }

    fn rich_tree() -> Node {
        Node::Module {
            body: vec![
                Node::Import { names: vec!["os".into(), "sys".into()] },
                Node::Assign {
                    targets: vec!["x".into()],
                    value: Box::new(Node::Call {
                        func: Box::new(Node::name("print")),
                        args: vec![
                            Node::Str("hi".into()),
                            Node::Int(-3),
                            Node::Bool(true),
                            Node::Bool(false),
                            Node::NoneLiteral,
                            Node::Data(json!([1, "a", {"k": null}])),
                        ],
                    }),
                },
                Node::FunctionDef {
                    name: "run".into(),
                    is_async: true,
                    params: Vec::new(),
                    body: vec![
                        Node::ExprStmt {
                            value: Box::new(Node::binop(
                                BinaryOperator::ShiftLeft,
                                Node::Int(1),
                                Node::binop(BinaryOperator::Mul, Node::name("x"), Node::Int(2)),
                            )),
                        },
                        Node::Return { value: None },
                    ],
                },
            ],
        }
    }

    fn dictionary(version: &str) -> Arc<MorphemeDictionary> {
        DictionaryRegistry::global().get(version).unwrap()
    }

    fn add_stream(dictionary: Arc<MorphemeDictionary>) -> TokenStream {
        StreamEncoder::new(dictionary).encode_source(&FixtureFrontEnd, ADD_SOURCE).unwrap()
    }

    fn keys_of(dictionary: &MorphemeDictionary, tokens: &[u32]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| dictionary.entry_for_index(*t as usize).unwrap().key.clone())
            .collect()
    }

    /// Built-in 1.0 rows up to and including `meta:unknown`; the stream markers fall off the end.
    fn truncated_dictionary() -> Arc<MorphemeDictionary> {
        let mut schema = builtin_schema("1.0").unwrap();
        let unknown = schema.entries.iter().position(|e| e.key == "meta:unknown").unwrap();
        schema.entries.truncate(unknown + 1);
        schema.version = "1.0-lite".into();
        Arc::new(MorphemeDictionary::from_schema(schema).unwrap())
    }

// # ✅ 1. Token sequence for a small function

    #[test]
    fn add_function_token_sequence() {
        let dict = dictionary("1.0");
        let stream = add_stream(dict.clone());
        assert_eq!(
            keys_of(&dict, &stream.tokens),
            vec![
                keys::STREAM_START,
                keys::VERSION_HEADER,
                keys::DICTIONARY_VERSION,
                keys::MODULE,
                keys::FUNCTION,
                keys::PARAMETER,
                keys::PARAMETER,
                keys::RETURN,
                "op:add",
                keys::IDENTIFIER,
                keys::IDENTIFIER,
                keys::STREAM_END,
            ]
        );
        assert_eq!(stream.tokens[4], 0);
        assert_eq!(stream.source_language, "python");
        assert_eq!(stream.source_language_version, "3.11");
        assert_eq!(stream.dictionary_version, "1.0");
        assert_eq!(stream.source_hash.len(), 64);
    }

    #[test]
    fn add_function_payloads() {
        let stream = add_stream(dictionary("1.0"));
        let p = &stream.payloads;
        assert_eq!(p.identifiers, vec!["add", "a", "b", "a", "b"]);
        assert_eq!(p.strings, vec![stream.encoder_version.clone(), "1.0".to_string()]);
        assert_eq!(p.counts, vec![1, 2, 1]);
        assert_eq!(p.flags, vec![false, true]);
        assert!(p.numbers.is_empty());
        let types: Vec<&str> = p.entries.iter().map(|e| e.payload_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "encoder_version",
                "dictionary_version",
                "module_body_length",
                "function_name",
                "function_async",
                "function_arg_count",
                "parameter_name",
                "parameter_name",
                "function_body_length",
                "return_has_value",
                "identifier_name",
                "identifier_name",
            ]
        );
        assert_eq!(p.entries[3].token_index, Some(4));
        stream.validate().unwrap();
    }

// # ✅ 2. Decoder is the inverse of the encoder

    #[test]
    fn decode_restores_add_tree() {
        let dict = dictionary("1.0");
        let stream = add_stream(dict.clone());
        assert_eq!(StreamDecoder::new(dict).decode(&stream).unwrap(), add_tree());
    }

    #[test]
    fn decode_restores_every_node_kind() {
        let dict = dictionary("1.1");
        let tree = rich_tree();
        let stream =
            StreamEncoder::new(dict.clone()).encode(&tree, b"fixture", "python", "3.12").unwrap();
        assert_eq!(stream.payloads.structured, vec![json!([1, "a", {"k": null}])]);
        assert_eq!(StreamDecoder::new(dict).decode(&stream).unwrap(), tree);
    }

    #[test]
    fn empty_module_roundtrips() {
        let dict = dictionary("1.0");
        let stream = StreamEncoder::new(dict.clone()).encode_source(&FixtureFrontEnd, "").unwrap();
        assert_eq!(stream.tokens.len(), 5);
        let decoded = StreamDecoder::new(dict).decode(&stream).unwrap();
        assert_eq!(decoded, Node::Module { body: Vec::new() });
    }

// # ✅ 3. Strict and lenient key lookups

    #[test]
    fn strict_encoding_fails_on_missing_key() {
        let encoder = StreamEncoder::new(truncated_dictionary());
        let err = encoder.encode(&add_tree(), b"", "python", "3.11").unwrap_err();
        assert!(matches!(
            err,
            SyntaxError::Dictionary(DictionaryError::UnknownMorpheme(ref key))
                if key == keys::STREAM_START
        ));
    }

    #[test]
    fn lenient_encoding_falls_back_to_unknown() {
        let dict = truncated_dictionary();
        let stream = StreamEncoder::new(dict.clone())
            .strict(false)
            .encode(&add_tree(), b"", "python", "3.11")
            .unwrap();
        let unknown = dict.unknown_index() as u32;
        assert_eq!(stream.tokens[0], unknown);
        assert_eq!(*stream.tokens.last().unwrap(), unknown);
        assert_eq!(stream.tokens[4], 0);
    }

    #[test]
    fn front_end_errors_propagate() {
        let encoder = StreamEncoder::new(dictionary("1.0"));
        let err = encoder.encode_source(&FixtureFrontEnd, "x = (").unwrap_err();
        assert!(matches!(err, SyntaxError::Parse(_)));

        let err = encoder.encode(&Node::Int(1), b"", "python", "3.11").unwrap_err();
        assert!(matches!(err, SyntaxError::Parse(_)));
    }

// # ✅ 4. Source maps

    #[test]
    fn source_map_has_one_mapping_per_token() {
        let stream = StreamEncoder::new(dictionary("1.0"))
            .with_source_map(true)
            .encode_source(&FixtureFrontEnd, ADD_SOURCE)
            .unwrap();
        let map = stream.source_map.as_ref().unwrap();
        assert_eq!(map.len(), stream.tokens.len());
        assert_eq!(map.source_hash, stream.source_hash);
        assert_eq!(map.mappings[0].node, "synthetic");
        assert_eq!(map.mappings[3].node, "Module");
        assert_eq!(map.mappings[4].node, "FunctionDef");
        assert_eq!(map.mappings[4].key, keys::FUNCTION);
        assert_eq!(map.mappings[8].node, "BinOp");
        assert!(map.mappings.iter().enumerate().all(|(i, m)| m.token as usize == i));
        stream.validate().unwrap();

        for m in &map.mappings {
            if m.node == "synthetic" {
                assert_eq!((m.start, m.end), ((0, 0), (0, 0)), "{}", m.key);
            } else {
                assert_ne!(m.start, (0, 0), "{}", m.key);
                assert!(m.end > m.start, "{}", m.key);
            }
        }
        assert_eq!(map.mappings[3].start, (1, 0));
        // parameters share the def's span
        assert_eq!(map.mappings[5].start, (1, 0));
        assert_eq!(map.mappings[7].start, (2, 4));
        assert_eq!((map.mappings[8].start, map.mappings[8].end), ((2, 11), (2, 16)));
        assert_eq!((map.mappings[10].start, map.mappings[10].end), ((2, 15), (2, 16)));
    }

    #[test]
    fn trees_without_spans_map_to_zero() {
        let stream = StreamEncoder::new(dictionary("1.0"))
            .with_source_map(true)
            .encode(&add_tree(), ADD_SOURCE.as_bytes(), "python", "3.11")
            .unwrap();
        let map = stream.source_map.unwrap();
        assert!(map.mappings.iter().all(|m| m.start == (0, 0) && m.end == (0, 0)));
    }

    #[test]
    fn preorder_matches_span_indices() {
        let tree = add_tree();
        let kinds: Vec<_> = tree.preorder().iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, ["Module", "FunctionDef", "Return", "BinOp", "Name", "Name"]);
        assert_eq!(kinds.len(), add_spans().len());

        let mut spans = SpanTable::new();
        spans.insert(3, Span::new((2, 11), (2, 16)));
        assert_eq!(spans.get(3), Some(Span::new((2, 11), (2, 16))));
        assert_eq!(spans.get(0), None);
        assert_eq!(spans.get(99), None);
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn source_map_is_off_by_default() {
        let stream = add_stream(dictionary("1.0"));
        assert!(stream.source_map.is_none());
    }

// # ✅ 5. Decoder error paths

    #[test]
    fn decoder_rejects_other_dictionary_version() {
        let stream = add_stream(dictionary("1.1"));
        let err = StreamDecoder::new(dictionary("1.0")).decode(&stream).unwrap_err();
        assert!(matches!(err, SyntaxError::DictionaryMismatch { .. }));
    }

    #[test]
    fn decoder_rejects_truncated_and_extended_streams() {
        let dict = dictionary("1.0");
        let stream = add_stream(dict.clone());
        let decoder = StreamDecoder::new(dict);

        let mut truncated = stream.clone();
        truncated.tokens.pop();
        assert!(matches!(decoder.decode(&truncated), Err(SyntaxError::UnexpectedEnd { .. })));

        let mut extended = stream.clone();
        let end = *extended.tokens.last().unwrap();
        extended.tokens.push(end);
        assert!(matches!(
            decoder.decode(&extended),
            Err(SyntaxError::UnexpectedToken { position: 12, .. })
        ));

        let mut swapped = stream.clone();
        swapped.tokens.swap(0, 1);
        assert!(matches!(
            decoder.decode(&swapped),
            Err(SyntaxError::UnexpectedToken { position: 0, .. })
        ));

        let mut bad_index = stream;
        bad_index.tokens[5] = 9_999;
        assert!(matches!(
            decoder.decode(&bad_index),
            Err(SyntaxError::Dictionary(DictionaryError::IndexOutOfRange { index: 9_999, .. }))
        ));
    }

    #[test]
    fn decoder_rejects_missing_payloads() {
        let dict = dictionary("1.0");
        let mut stream = add_stream(dict.clone());
        stream.payloads.entries.truncate(4);
        assert!(matches!(StreamDecoder::new(dict).decode(&stream), Err(SyntaxError::Model(_))));
    }
}
