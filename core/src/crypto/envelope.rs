//! crypto/envelope.rs
//! Passphrase-sealed envelope around the payload frame.

use tracing::debug;

use crate::constants::{NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::crypto::aead::AeadImpl;
use crate::crypto::kdf::derive_envelope_key;
use crate::crypto::nonce::EnvelopeRandomness;
use crate::crypto::types::{AeadAlgorithm, CryptoError, KdfParameters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    pub aead: AeadAlgorithm,
    pub kdf_parameters: KdfParameters,
    pub salt: [u8; SALT_LEN],
    pub hkdf_salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Seal `plaintext` with fresh salts and nonce.
pub fn seal(
    plaintext: &[u8],
    passphrase: &[u8],
    aad: &[u8],
    aead: AeadAlgorithm,
    kdf_parameters: &KdfParameters,
) -> Result<SealedEnvelope, CryptoError> {
    let randomness = EnvelopeRandomness::generate();
    seal_with(plaintext, passphrase, aad, aead, kdf_parameters, randomness)
}

/// Seal with caller-supplied randomness.
pub fn seal_with(
    plaintext: &[u8],
    passphrase: &[u8],
    aad: &[u8],
    aead: AeadAlgorithm,
    kdf_parameters: &KdfParameters,
    randomness: EnvelopeRandomness,
) -> Result<SealedEnvelope, CryptoError> {
    let key =
        derive_envelope_key(passphrase, &randomness.salt, &randomness.hkdf_salt, kdf_parameters)?;
    let (ciphertext, tag) = AeadImpl::new(aead, &key)?.seal(&randomness.nonce, aad, plaintext)?;
    debug!(aead = %aead, plaintext = plaintext.len(), "envelope sealed");
    Ok(SealedEnvelope {
        aead,
        kdf_parameters: *kdf_parameters,
        salt: randomness.salt,
        hkdf_salt: randomness.hkdf_salt,
        nonce: randomness.nonce,
        ciphertext,
        tag,
    })
}

pub fn open(
    envelope: &SealedEnvelope,
    passphrase: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_envelope_key(
        passphrase,
        &envelope.salt,
        &envelope.hkdf_salt,
        &envelope.kdf_parameters,
    )?;
    AeadImpl::new(envelope.aead, &key)?.open(
        &envelope.nonce,
        aad,
        &envelope.ciphertext,
        &envelope.tag,
    )
}
