// Envelope crypto:

// * Argon2id + HKDF key derivation
// * AEAD seal/open for both algorithms
// * metadata AAD layout

#[cfg(test)]
mod tests {
    use qyn1_core::constants::METADATA_AAD_PREFIX;
    use qyn1_core::crypto::{
        build_metadata_aad, derive_envelope_key, open, seal, seal_with, AeadAlgorithm, AeadImpl,
        CryptoError, EnvelopeRandomness, KdfParameters,
    };
    use serde_json::json;

    fn light_kdf() -> KdfParameters {
        KdfParameters { time_cost: 1, memory_cost: 1024, parallelism: 1, hash_len: 32 }
    }

    fn fixed_randomness() -> EnvelopeRandomness {
        EnvelopeRandomness { salt: [1u8; 16], hkdf_salt: [2u8; 16], nonce: [3u8; 12] }
    }

// # ✅ 1. Key derivation

    #[test]
    fn derivation_is_deterministic_and_salt_bound() {
        let kdf = light_kdf();
        let a = derive_envelope_key(b"pw", &[1u8; 16], &[2u8; 16], &kdf).unwrap();
        let b = derive_envelope_key(b"pw", &[1u8; 16], &[2u8; 16], &kdf).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, derive_envelope_key(b"pw", &[9u8; 16], &[2u8; 16], &kdf).unwrap());
        assert_ne!(a, derive_envelope_key(b"pw", &[1u8; 16], &[9u8; 16], &kdf).unwrap());
        assert_ne!(a, derive_envelope_key(b"other", &[1u8; 16], &[2u8; 16], &kdf).unwrap());
    }

    #[test]
    fn kdf_parameters_are_bounded() {
        light_kdf().validate().unwrap();
        KdfParameters::default().validate().unwrap();
        let cases = [
            KdfParameters { time_cost: 0, ..light_kdf() },
            KdfParameters { time_cost: 65, ..light_kdf() },
            KdfParameters { parallelism: 0, ..light_kdf() },
            KdfParameters { memory_cost: 4, ..light_kdf() },
            KdfParameters { memory_cost: 2 * 1024 * 1024, ..light_kdf() },
            KdfParameters { hash_len: 16, ..light_kdf() },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(CryptoError::KdfParameters(_))),
                "{:?}",
                params
            );
            assert!(derive_envelope_key(b"pw", &[0; 16], &[0; 16], &params).is_err());
        }
    }

// # ✅ 2. AEAD primitives

    #[test]
    fn aead_roundtrip_for_both_algorithms() {
        for algorithm in [AeadAlgorithm::ChaCha20Poly1305, AeadAlgorithm::Aes256Gcm] {
            let aead = AeadImpl::new(algorithm, &[7u8; 32]).unwrap();
            let (ct, tag) = aead.seal(&[0u8; 12], b"aad", b"plaintext").unwrap();
            assert_eq!(ct.len(), 9);
            assert_eq!(aead.open(&[0u8; 12], b"aad", &ct, &tag).unwrap(), b"plaintext");
            assert!(matches!(
                aead.open(&[0u8; 12], b"aaD", &ct, &tag),
                Err(CryptoError::DecryptionFailed)
            ));
        }
    }

    #[test]
    fn aead_rejects_short_keys() {
        assert!(matches!(
            AeadImpl::new(AeadAlgorithm::Aes256Gcm, &[0u8; 16]),
            Err(CryptoError::InvalidKeyLen { expected: 32, actual: 16 })
        ));
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("AES-256-GCM".parse::<AeadAlgorithm>().unwrap(), AeadAlgorithm::Aes256Gcm);
        assert_eq!(
            "chacha20-poly1305".parse::<AeadAlgorithm>().unwrap(),
            AeadAlgorithm::ChaCha20Poly1305
        );
        assert!("des".parse::<AeadAlgorithm>().is_err());
        assert_eq!(AeadAlgorithm::default(), AeadAlgorithm::ChaCha20Poly1305);
        assert_eq!(serde_json::to_string(&AeadAlgorithm::Aes256Gcm).unwrap(), "\"aes-256-gcm\"");
    }

// # ✅ 3. Envelopes

    #[test]
    fn envelope_roundtrip_and_failures() {
        let env =
            seal(b"payload", b"secret", b"aad", AeadAlgorithm::Aes256Gcm, &light_kdf()).unwrap();
        assert_eq!(open(&env, b"secret", b"aad").unwrap(), b"payload");
        assert!(matches!(open(&env, b"wrong", b"aad"), Err(CryptoError::DecryptionFailed)));
        assert!(matches!(open(&env, b"secret", b"other"), Err(CryptoError::DecryptionFailed)));

        let mut tampered = env.clone();
        tampered.ciphertext[0] ^= 1;
        assert!(matches!(open(&tampered, b"secret", b"aad"), Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn fixed_randomness_is_reproducible() {
        let kdf = light_kdf();
        let aead = AeadAlgorithm::ChaCha20Poly1305;
        let a = seal_with(b"x", b"pw", b"", aead, &kdf, fixed_randomness()).unwrap();
        let b = seal_with(b"x", b"pw", b"", aead, &kdf, fixed_randomness()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.salt, [1u8; 16]);
        assert_eq!(a.nonce, [3u8; 12]);
    }

    #[test]
    fn fresh_randomness_differs() {
        let kdf = light_kdf();
        let a = seal(b"x", b"pw", b"", AeadAlgorithm::ChaCha20Poly1305, &kdf).unwrap();
        let b = seal(b"x", b"pw", b"", AeadAlgorithm::ChaCha20Poly1305, &kdf).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

// # ✅ 4. Metadata AAD

    #[test]
    fn aad_is_prefix_plus_canonical_json() {
        let aad = build_metadata_aad(&json!({"b": 2, "a": "é"})).unwrap();
        let mut expected = METADATA_AAD_PREFIX.to_vec();
        expected.extend_from_slice(br#"{"a":"\u00e9","b":2}"#);
        assert_eq!(aad, expected);
        assert!(aad.starts_with(b"QYN1-METADATA-v1:"));
    }
}
