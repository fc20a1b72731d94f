//! migration.rs
//! Re-encode a package against another dictionary and/or package version.
//!
//! Tokens are remapped by construct key. Keys the target dictionary lacks
//! either fail the migration (strict) or fall back to `meta:unknown`. The
//! source compression mode, AEAD and KDF parameters are carried over and the
//! envelope is always re-sealed with fresh salts and nonce.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::compression::ProjectAssets;
use crate::config::{DecodeOptions, EncodeOptions};
use crate::dictionary::{DictionaryError, DictionaryRegistry, MorphemeDictionary};
use crate::model::{PayloadChannel, TokenStream};
use crate::package::{decode_package, encode_package_with, inspect_package};
use crate::types::PackageError;
use crate::versioning::{parse_any_version, VersionError};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("morpheme '{key}' has no counterpart in dictionary {target}")]
    MissingKey { key: String, target: String },
}

impl From<DictionaryError> for MigrationError {
    fn from(e: DictionaryError) -> Self {
        MigrationError::Package(e.into())
    }
}

impl From<VersionError> for MigrationError {
    fn from(e: VersionError) -> Self {
        MigrationError::Package(e.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub tokens_migrated: usize,
    /// Source keys mapped to `meta:unknown`, sorted.
    pub missing_keys: Vec<String>,
    pub dictionary_version: String,
    pub package_version: String,
}

/// Map `key` into `target`, recording misses.
fn remap_key(
    key: &str,
    target: &MorphemeDictionary,
    strict: bool,
    missing: &mut BTreeSet<String>,
) -> Result<usize, MigrationError> {
    if target.contains_key(key) {
        return Ok(target.index_for_key(key, true)?);
    }
    if strict {
        return Err(MigrationError::MissingKey {
            key: key.to_string(),
            target: target.version().to_string(),
        });
    }
    if missing.insert(key.to_string()) {
        warn!(key, target = target.version(), "morpheme missing from target dictionary");
    }
    Ok(target.unknown_index())
}

fn remap_stream(
    stream: &mut TokenStream,
    source: &MorphemeDictionary,
    target: &MorphemeDictionary,
    strict: bool,
) -> Result<Vec<String>, MigrationError> {
    let mut missing = BTreeSet::new();
    for token in stream.tokens.iter_mut() {
        let key = &source.entry_for_index(*token as usize)?.key;
        let index = remap_key(key, target, strict, &mut missing)?;
        *token = index as u32;
    }
    if let Some(map) = stream.source_map.as_mut() {
        for (entry, token) in map.mappings.iter_mut().zip(&stream.tokens) {
            entry.token = *token;
            entry.key = target.entry_for_index(*token as usize)?.key.clone();
        }
        map.dictionary_version = target.version().to_string();
    }

    // The dictionary version is also recorded as a string payload.
    let mut string_slot = 0usize;
    for entry in &stream.payloads.entries {
        if entry.channel != PayloadChannel::String {
            continue;
        }
        if entry.payload_type == "dictionary_version" {
            if let Some(value) = stream.payloads.strings.get_mut(string_slot) {
                *value = target.version().to_string();
            }
        }
        string_slot += 1;
    }
    stream.dictionary_version = target.version().to_string();
    Ok(missing.into_iter().collect())
}

/// Decode `data`, remap it, and seal it again.
///
/// `None` targets keep the source dictionary or package version.
pub fn migrate_package(
    data: &[u8],
    passphrase: &[u8],
    target_dictionary: Option<&str>,
    target_package_version: Option<&str>,
    strict: bool,
    registry: &DictionaryRegistry,
) -> Result<(Vec<u8>, MigrationReport), MigrationError> {
    let info = inspect_package(data)?;
    let decoded = decode_package(data, passphrase, registry, &DecodeOptions::default())?;
    let mut stream = decoded.stream;

    let source = registry.get(&stream.dictionary_version)?;
    let target = registry.get(target_dictionary.unwrap_or(&stream.dictionary_version))?;
    let missing_keys = remap_stream(&mut stream, &source, &target, strict)?;

    let package_version = match target_package_version {
        Some(text) => parse_any_version(text)?,
        None => decoded.payload_version,
    };
    let mut options = EncodeOptions {
        strict,
        include_source_map: stream.source_map.is_some(),
        preferred_versions: vec![package_version.text()],
        aead: info.aead,
        kdf: info.kdf_parameters,
        backend: Some(info.metadata.compression_backend.clone()),
        ..EncodeOptions::default()
    };
    if let Some(extras) = &decoded.extras {
        options = options.with_mode(extras.mode);
    }

    let assets = ProjectAssets::default();
    let encoded = encode_package_with(&stream, passphrase, &options, registry, &assets)?;
    debug!(
        from = source.version(),
        to = target.version(),
        version = %package_version,
        missing = missing_keys.len(),
        "package migrated"
    );
    let report = MigrationReport {
        tokens_migrated: stream.tokens.len(),
        missing_keys,
        dictionary_version: target.version().to_string(),
        package_version: package_version.text(),
    };
    Ok((encoded.bytes, report))
}
