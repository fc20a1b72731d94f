//! crypto/nonce.rs
//! Fresh per-package randomness.
//!
//! Every encode draws new salts and a new nonce from the OS RNG; nothing is
//! derived from earlier packages.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::{NONCE_LEN, SALT_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeRandomness {
    pub salt: [u8; SALT_LEN],
    pub hkdf_salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
}

impl EnvelopeRandomness {
    pub fn generate() -> Self {
        let mut out = Self {
            salt: [0u8; SALT_LEN],
            hkdf_salt: [0u8; SALT_LEN],
            nonce: [0u8; NONCE_LEN],
        };
        OsRng.fill_bytes(&mut out.salt);
        OsRng.fill_bytes(&mut out.hkdf_salt);
        OsRng.fill_bytes(&mut out.nonce);
        out
    }
}
