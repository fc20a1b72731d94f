// Versions, options and counters:

// * version parsing, support window and negotiation
// * compatibility matrix
// * encode/decode options from JSON
// * codec counters

#[cfg(test)]
mod tests {
    use qyn1_core::compression::CompressionMode;
    use qyn1_core::config::{ConfigError, DecodeOptions, EncodeOptions};
    use qyn1_core::crypto::AeadAlgorithm;
    use qyn1_core::limits::{LimitError, ResourceBudget};
    use qyn1_core::telemetry::counters::CodecCounters;
    use qyn1_core::versioning::{
        advertised_versions, compatibility_matrix, ensure_supported, negotiate_version,
        parse_any_version, Version, VersionError, CURRENT_PACKAGE_VERSION,
    };

// # ✅ 1. Parsing and the support window

    #[test]
    fn versions_parse_with_and_without_patch() {
        assert_eq!(parse_any_version("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(parse_any_version(" 1.1.3 ").unwrap(), Version::new(1, 1, 3));
        for bad in ["1", "1.2.3.4", "a.b", "1.-2", "", "1..2", "300.0"] {
            assert!(matches!(parse_any_version(bad), Err(VersionError::Invalid(_))), "{:?}", bad);
        }
        assert_eq!(Version::new(1, 2, 0).short_text(), "1.2");
        assert_eq!(Version::new(1, 2, 5).short_text(), "1.2.5");
        assert_eq!(CURRENT_PACKAGE_VERSION.to_string(), "1.2.0");
    }

    #[test]
    fn support_window_is_closed() {
        ensure_supported(Version::new(1, 0, 0)).unwrap();
        ensure_supported(CURRENT_PACKAGE_VERSION).unwrap();
        assert!(matches!(
            ensure_supported(Version::new(2, 0, 0)),
            Err(VersionError::UnsupportedMajor { found: 2, expected: 1 })
        ));
        assert!(matches!(
            ensure_supported(Version::new(0, 9, 0)),
            Err(VersionError::UnsupportedMajor { .. })
        ));
    }

    #[test]
    fn version_serde_uses_text() {
        let v: Version = serde_json::from_str("\"1.1\"").unwrap();
        assert_eq!(v, Version::new(1, 1, 0));
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"1.1.0\"");
        assert!(serde_json::from_str::<Version>("\"x\"").is_err());
    }

// # ✅ 2. Negotiation

    #[test]
    fn negotiation_picks_highest_common_version() {
        assert_eq!(negotiate_version(None).unwrap(), CURRENT_PACKAGE_VERSION);
        assert_eq!(negotiate_version(Some(&[])).unwrap(), CURRENT_PACKAGE_VERSION);
        let offered = vec!["1.0".to_string(), "1.1.0".to_string(), "9.0".to_string()];
        assert_eq!(negotiate_version(Some(offered.as_slice())).unwrap(), Version::new(1, 1, 0));
        let none = vec!["2.0".to_string()];
        assert!(matches!(
            negotiate_version(Some(none.as_slice())),
            Err(VersionError::NoCompatibleVersion(_))
        ));
        let garbage = vec!["one".to_string()];
        assert!(matches!(
            negotiate_version(Some(garbage.as_slice())),
            Err(VersionError::Invalid(_))
        ));
    }

    #[test]
    fn compatibility_matrix_is_backward_only() {
        let matrix = compatibility_matrix(&[Version::new(2, 0, 0)]);
        assert!(matrix["1.2.0"]["1.0.0"]);
        assert!(matrix["1.2.0"]["1.2.0"]);
        assert!(!matrix["1.0.0"]["1.2.0"]);
        assert!(!matrix["2.0.0"]["1.2.0"]);
        assert!(!matrix["1.2.0"]["2.0.0"]);
        assert_eq!(matrix.len(), 4);
        assert_eq!(advertised_versions(), vec!["1.0.0", "1.1.0", "1.2.0"]);
    }

// # ✅ 3. Options

    #[test]
    fn encode_options_defaults() {
        let options = EncodeOptions::default();
        assert_eq!(options.compression_mode().unwrap(), CompressionMode::Balanced);
        assert!(options.strict);
        assert!(!options.include_source_map);
        assert_eq!(options.aead, AeadAlgorithm::ChaCha20Poly1305);
        assert!(options.worker_count() >= 1);
        assert_eq!(EncodeOptions { workers: 3, ..options }.worker_count(), 3);
    }

    #[test]
    fn encode_options_from_json() {
        let options = EncodeOptions::from_json(
            r#"{
                "mode": "Maximum",
                "aead": "aes-256-gcm",
                "preferred_versions": ["1.1"],
                "kdf": {"time_cost": 2, "memory_cost": 2048, "parallelism": 1, "hash_len": 32}
            }"#,
        )
        .unwrap();
        assert_eq!(options.compression_mode().unwrap(), CompressionMode::Maximum);
        assert_eq!(options.aead, AeadAlgorithm::Aes256Gcm);
        assert_eq!(options.kdf.memory_cost, 2048);
        assert_eq!(options.preferred_versions, vec!["1.1"]);
        assert!(options.strict);

        assert_eq!(EncodeOptions::from_json("{}").unwrap(), EncodeOptions::default());
    }

    #[test]
    fn encode_options_reject_bad_json() {
        assert!(matches!(
            EncodeOptions::from_json(r#"{"mode": "turbo"}"#),
            Err(ConfigError::Compression(_))
        ));
        assert!(matches!(
            EncodeOptions::from_json(r#"{"colour": "red"}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            EncodeOptions::from_json(r#"{"aead": "des"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn backend_override_replaces_the_mode_preset() {
        let options = EncodeOptions::from_json(r#"{"backend": "fse-production"}"#).unwrap();
        let config = options.compression_config().unwrap();
        assert_eq!(config.backend, "fse-production");
        assert_eq!(config.mode, CompressionMode::Balanced);

        assert!(matches!(
            EncodeOptions::from_json(r#"{"backend": "duda"}"#),
            Err(ConfigError::Compression(_))
        ));
        let text = serde_json::to_string(&EncodeOptions::default()).unwrap();
        assert!(!text.contains("backend"));
    }

    #[test]
    fn decode_options_and_budget() {
        let options: DecodeOptions =
            serde_json::from_str(r#"{"budget": {"max_symbols": 10}}"#).unwrap();
        assert_eq!(options.budget.max_symbols, 10);
        assert_eq!(options.budget.max_model_bytes, ResourceBudget::default().max_model_bytes);
        options.budget.ensure_symbols(10).unwrap();
        assert_eq!(
            options.budget.ensure_symbols(11),
            Err(LimitError { resource: "symbols", have: 11, max: 10 })
        );
    }

// # ✅ 4. Counters

    fn sample_counters(scale: u64) -> CodecCounters {
        let mut c = CodecCounters::default();
        c.add_payload(10 * scale as usize, 4, 80 * scale, 6, 100);
        c.add_wrapper(250);
        c
    }

    #[test]
    fn counters_accumulate_and_merge() {
        let a = sample_counters(1);
        assert_eq!(a.packages, 1);
        assert_eq!(a.bytes_tokens_raw, 10);
        assert!((a.token_ratio() - 0.6).abs() < 1e-9);
        assert_eq!(CodecCounters::default().token_ratio(), 0.0);

        let mut merged = a.clone();
        merged.merge(&sample_counters(2));
        let mut added = a;
        added += sample_counters(2);
        assert_eq!(merged, added);
        assert_eq!(added.packages, 2);
        assert_eq!(added.tokens, 30);
        assert_eq!(added.bytes_wrapper, 500);
    }

    #[test]
    fn raw_bits_round_up_to_bytes() {
        let mut c = CodecCounters::default();
        c.add_payload(1, 0, 9, 1, 1);
        assert_eq!(c.bytes_tokens_raw, 2);
    }

    #[test]
    fn counters_bincode_roundtrip() {
        let counters = sample_counters(3);
        let bytes = counters.to_bytes().unwrap();
        assert_eq!(CodecCounters::from_bytes(&bytes).unwrap(), counters);
        assert!(CodecCounters::from_bytes(&[]).is_err());
    }
}
