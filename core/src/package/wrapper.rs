//! package/wrapper.rs
//! Outer `QYN1` frame: a canonical JSON document carrying the metadata in
//! clear and the sealed payload frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::constants::{ENCRYPTION_VERSION, NONCE_LEN, SALT_LEN, TAG_LEN, WRAPPER_MAGIC};
use crate::crypto::{AeadAlgorithm, CryptoError, KdfParameters, SealedEnvelope, KDF_ARGON2ID};
use crate::framing::{read_frame, write_frame, FeatureFlags, FrameHeader};
use crate::package::metadata::PackageMetadata;
use crate::types::PackageError;
use crate::utils::{b64_decode, b64_encode, canonical_json};
use crate::versioning::{ensure_supported, parse_any_version, Version};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapperDocument {
    pub version: String,
    pub payload_version: String,
    /// Sorted feature names.
    pub payload_features: Vec<String>,
    /// Kept as a JSON value so the AAD is computed over exactly what was read.
    pub metadata: Value,
    pub nonce: String,
    pub salt: String,
    pub hkdf_salt: String,
    pub ciphertext: String,
    pub tag: String,
    pub encryption_version: u32,
    pub aead: AeadAlgorithm,
    pub kdf: String,
    pub kdf_parameters: KdfParameters,
}

fn fixed<const N: usize>(field: &'static str, text: &str) -> Result<[u8; N], PackageError> {
    let raw = b64_decode(text)?;
    <[u8; N]>::try_from(raw.as_slice()).map_err(|_| {
        PackageError::Crypto(CryptoError::InvalidLength {
            field,
            expected: N,
            actual: raw.len(),
        })
    })
}

impl WrapperDocument {
    pub fn new(
        version: Version,
        payload_version: Version,
        features: FeatureFlags,
        metadata: &PackageMetadata,
        envelope: &SealedEnvelope,
    ) -> Result<Self, PackageError> {
        Ok(Self {
            version: version.text(),
            payload_version: payload_version.text(),
            payload_features: features.names(),
            metadata: serde_json::to_value(metadata)?,
            nonce: b64_encode(&envelope.nonce),
            salt: b64_encode(&envelope.salt),
            hkdf_salt: b64_encode(&envelope.hkdf_salt),
            ciphertext: b64_encode(&envelope.ciphertext),
            tag: b64_encode(&envelope.tag),
            encryption_version: ENCRYPTION_VERSION,
            aead: envelope.aead,
            kdf: KDF_ARGON2ID.to_string(),
            kdf_parameters: envelope.kdf_parameters,
        })
    }

    pub fn parsed_metadata(&self) -> Result<PackageMetadata, PackageError> {
        let metadata: PackageMetadata = serde_json::from_value(self.metadata.clone())?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Rebuild the sealed envelope, bounding the KDF parameters first.
    pub fn envelope(&self) -> Result<SealedEnvelope, PackageError> {
        if self.kdf != KDF_ARGON2ID {
            return Err(CryptoError::UnsupportedKdf(self.kdf.clone()).into());
        }
        if self.encryption_version != ENCRYPTION_VERSION {
            return Err(PackageError::mismatch(
                "encryption_version",
                ENCRYPTION_VERSION,
                self.encryption_version,
            ));
        }
        self.kdf_parameters.validate()?;
        Ok(SealedEnvelope {
            aead: self.aead,
            kdf_parameters: self.kdf_parameters,
            salt: fixed::<SALT_LEN>("salt", &self.salt)?,
            hkdf_salt: fixed::<SALT_LEN>("hkdf_salt", &self.hkdf_salt)?,
            nonce: fixed::<NONCE_LEN>("nonce", &self.nonce)?,
            ciphertext: b64_decode(&self.ciphertext)?,
            tag: fixed::<TAG_LEN>("tag", &self.tag)?,
        })
    }

    pub fn to_frame(&self, features: FeatureFlags) -> Result<Vec<u8>, PackageError> {
        let version = parse_any_version(&self.version)?;
        let body = canonical_json(self)?;
        let frame = write_frame(WRAPPER_MAGIC, version, features, &body)?;
        debug!(
            version = %version,
            features = ?features.names(),
            bytes = frame.len(),
            "wrapper frame written"
        );
        Ok(frame)
    }
}

/// Read the wrapper frame and check it against its own JSON body.
///
/// No passphrase is needed; nothing here touches the ciphertext.
pub fn read_wrapper(data: &[u8]) -> Result<(FrameHeader, WrapperDocument), PackageError> {
    let (frame, remainder) = read_frame(data, WRAPPER_MAGIC)?;
    if !remainder.is_empty() {
        return Err(PackageError::Validation(format!(
            "{} unexpected bytes after wrapper frame",
            remainder.len()
        )));
    }
    ensure_supported(frame.header.version)?;

    let document: WrapperDocument = serde_json::from_slice(frame.body)?;
    let declared = parse_any_version(&document.version)?;
    if declared != frame.header.version {
        return Err(PackageError::mismatch("wrapper version", frame.header.version, declared));
    }
    let advertised = FeatureFlags::from_names(&document.payload_features)?;
    if advertised != frame.header.features {
        return Err(PackageError::FeatureMismatch {
            wrapper: frame.header.features.names(),
            payload: document.payload_features.clone(),
        });
    }
    debug!(version = %declared, body = frame.body.len(), "wrapper frame read");
    Ok((frame.header, document))
}
