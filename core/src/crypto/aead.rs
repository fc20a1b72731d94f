//! crypto/aead.rs
//! AEAD interface for ChaCha20-Poly1305 and AES-256-GCM.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys, 12-byte nonces and 16-byte tags.
//! - The tag is carried separately from the ciphertext in the wrapper.
//! - Open fails closed with a single `DecryptionFailed` error.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

use crate::constants::{KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::crypto::types::{AeadAlgorithm, CryptoError};

#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    pub fn new(algorithm: AeadAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKeyLen { expected: KEY_LEN, actual: key.len() });
        }
        let bad_key = || CryptoError::InvalidKeyLen { expected: KEY_LEN, actual: key.len() };
        match algorithm {
            AeadAlgorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map(Self::AesGcm)
                .map_err(|_| bad_key()),
            AeadAlgorithm::ChaCha20Poly1305 => ChaCha20Poly1305::new_from_slice(key)
                .map(Self::ChaCha)
                .map_err(|_| bad_key()),
        }
    }

    /// Encrypt, returning `(ciphertext, tag)`.
    pub fn seal(
        &self,
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, [u8; TAG_LEN]), CryptoError> {
        let payload = Payload { msg: plaintext, aad };
        let mut sealed = match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt(AesNonce::from_slice(nonce), payload)
                .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))?,
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt(ChaNonce::from_slice(nonce), payload)
                .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into()))?,
        };
        let split = sealed.len() - TAG_LEN;
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&sealed[split..]);
        sealed.truncate(split);
        Ok((sealed, tag))
    }

    pub fn open(
        &self,
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut joined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        joined.extend_from_slice(ciphertext);
        joined.extend_from_slice(tag);
        let payload = Payload { msg: &joined, aad };
        match self {
            AeadImpl::AesGcm(cipher) => cipher.decrypt(AesNonce::from_slice(nonce), payload),
            AeadImpl::ChaCha(cipher) => cipher.decrypt(ChaNonce::from_slice(nonce), payload),
        }
        .map_err(|_| CryptoError::DecryptionFailed)
    }
}
