//! crypto/mod.rs
//! Envelope encryption: passphrase KDF, AEAD and metadata binding.

pub mod aad;
pub mod aead;
pub mod envelope;
pub mod kdf;
pub mod nonce;
pub mod types;

pub use aad::build_metadata_aad;
pub use aead::AeadImpl;
pub use envelope::{open, seal, seal_with, SealedEnvelope};
pub use kdf::derive_envelope_key;
pub use nonce::EnvelopeRandomness;
pub use types::*;
