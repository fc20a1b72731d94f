//! crypto/kdf.rs
//! Passphrase to envelope key.
//!
//! Design:
//! - Argon2id(passphrase, salt) -> 32-byte input keying material
//! - HKDF-SHA256(ikm, hkdf_salt, info) -> AEAD key
//!
//! The two salts are independent and both fresh per package.

use argon2::{Algorithm, Argon2, Params, Version};
use hkdf::Hkdf;
use sha2::Sha256;

use crate::constants::{HKDF_INFO, KEY_LEN, SALT_LEN};
use crate::crypto::types::{CryptoError, KdfParameters};

pub fn derive_envelope_key(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    hkdf_salt: &[u8; SALT_LEN],
    params: &KdfParameters,
) -> Result<[u8; KEY_LEN], CryptoError> {
    params.validate()?;

    let argon_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| CryptoError::KdfParameters(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut ikm = [0u8; KEY_LEN];
    argon
        .hash_password_into(passphrase, salt, &mut ikm)
        .map_err(|e| CryptoError::Failure(format!("argon2id failed: {}", e)))?;

    let hk = Hkdf::<Sha256>::new(Some(hkdf_salt), &ikm);
    let mut key = [0u8; KEY_LEN];
    hk.expand(HKDF_INFO, &mut key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
    ikm.fill(0);
    Ok(key)
}
