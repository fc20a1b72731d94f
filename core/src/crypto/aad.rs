//! crypto/aad.rs
//! Associated data binding package metadata to the ciphertext.

use serde::Serialize;

use crate::constants::METADATA_AAD_PREFIX;
use crate::crypto::types::CryptoError;
use crate::utils::canonical_json;

/// `b"QYN1-METADATA-v1:" || canonical_json(metadata)`.
pub fn build_metadata_aad<T: Serialize + ?Sized>(metadata: &T) -> Result<Vec<u8>, CryptoError> {
    let body = canonical_json(metadata)
        .map_err(|e| CryptoError::Failure(format!("metadata json: {}", e)))?;
    let mut aad = Vec::with_capacity(METADATA_AAD_PREFIX.len() + body.len());
    aad.extend_from_slice(METADATA_AAD_PREFIX);
    aad.extend_from_slice(&body);
    Ok(aad)
}
