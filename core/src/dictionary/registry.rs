//! dictionary/registry.rs
//! Version-keyed cache of loaded dictionaries.
//!
//! A registry is passed explicitly into encode/decode/migration. `global()`
//! exists for callers that want one shared instance; it is lazily populated
//! and only ever holds immutable dictionaries.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use tracing::debug;

use crate::dictionary::builtin::rows_for;
use crate::dictionary::types::{
    frequency_for_rank, DictionaryEntry, DictionaryError, DictionarySchema, EntryEncoding,
    MorphemeDictionary,
};

/// Dictionary versions shipped with this crate.
pub const SUPPORTED_DICTIONARY_VERSIONS: &[&str] = &["1.0", "1.1"];

/// Default dictionary version for new encodes.
pub const DEFAULT_DICTIONARY_VERSION: &str = "1.0";

/// Resolve a three-part alias such as `1.1.0` to its built-in version `1.1`.
pub fn canonical_dictionary_version(version: &str) -> &str {
    version
        .strip_suffix(".0")
        .filter(|base| SUPPORTED_DICTIONARY_VERSIONS.contains(base))
        .unwrap_or(version)
}

pub fn ensure_dictionary_supported(version: &str) -> Result<(), DictionaryError> {
    if SUPPORTED_DICTIONARY_VERSIONS.contains(&canonical_dictionary_version(version)) {
        Ok(())
    } else {
        Err(DictionaryError::UnknownVersion(version.to_string()))
    }
}

/// Build the checked-in artifact for a built-in version.
pub fn builtin_schema(version: &str) -> Result<DictionarySchema, DictionaryError> {
    let rows =
        rows_for(version).ok_or_else(|| DictionaryError::UnknownVersion(version.to_string()))?;
    let entries = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let rank = index + 1;
            DictionaryEntry {
                key: row.key.to_string(),
                morpheme: row.morpheme.to_string(),
                quenya_root: row.quenya_root.to_string(),
                gloss: row.gloss.to_string(),
                linguistic_justification: format!(
                    "The Quenya root '{}' conveys '{}' which aligns with {} \
                     semantics across target languages.",
                    row.quenya_root,
                    row.gloss,
                    row.key.replace(':', " ")
                ),
                ast_nodes: row.ast_nodes.iter().map(|n| n.to_string()).collect(),
                frequency_per_10k_loc: frequency_for_rank(rank),
                encoding: EntryEncoding::for_rank(rank),
            }
        })
        .collect();
    Ok(DictionarySchema {
        version: version.to_string(),
        entries,
    })
}

/// Load a built-in dictionary without caching.
pub fn load_dictionary(version: &str) -> Result<MorphemeDictionary, DictionaryError> {
    let version = canonical_dictionary_version(version);
    ensure_dictionary_supported(version)?;
    MorphemeDictionary::from_schema(builtin_schema(version)?)
}

#[derive(Debug, Default)]
pub struct DictionaryRegistry {
    cache: RwLock<HashMap<String, Arc<MorphemeDictionary>>>,
}

impl DictionaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide shared registry.
    pub fn global() -> &'static DictionaryRegistry {
        static GLOBAL: OnceLock<DictionaryRegistry> = OnceLock::new();
        GLOBAL.get_or_init(DictionaryRegistry::new)
    }

    /// Fetch a dictionary, loading a built-in version on first use.
    ///
    /// `1.0.0` and `1.1.0` resolve to the built-in `1.0` and `1.1`.
    pub fn get(&self, version: &str) -> Result<Arc<MorphemeDictionary>, DictionaryError> {
        if let Some(found) = self.read_cached(version) {
            return Ok(found);
        }
        let version = canonical_dictionary_version(version);
        if let Some(found) = self.read_cached(version) {
            return Ok(found);
        }

        let loaded = Arc::new(load_dictionary(version)?);
        debug!(version, entries = loaded.len(), "loaded built-in dictionary");

        let mut cache = self
            .cache
            .write()
            .map_err(|_| DictionaryError::Invalid("dictionary registry lock poisoned".into()))?;
        // Another thread may have raced us; keep the first instance.
        let entry = cache.entry(version.to_string()).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    /// Register an externally loaded dictionary under its own version.
    ///
    /// Published versions are immutable: registering a different dictionary
    /// under an already cached version fails.
    pub fn register(
        &self,
        dictionary: MorphemeDictionary,
    ) -> Result<Arc<MorphemeDictionary>, DictionaryError> {
        let version = dictionary.version().to_string();
        let mut cache = self
            .cache
            .write()
            .map_err(|_| DictionaryError::Invalid("dictionary registry lock poisoned".into()))?;
        if let Some(existing) = cache.get(&version) {
            if existing.entries() != dictionary.entries() {
                return Err(DictionaryError::Invalid(format!(
                    "dictionary version '{}' is already registered with different contents",
                    version
                )));
            }
            return Ok(Arc::clone(existing));
        }
        let shared = Arc::new(dictionary);
        cache.insert(version, Arc::clone(&shared));
        Ok(shared)
    }

    pub fn is_known(&self, version: &str) -> bool {
        SUPPORTED_DICTIONARY_VERSIONS.contains(&canonical_dictionary_version(version))
            || self.read_cached(version).is_some()
    }

    fn read_cached(&self, version: &str) -> Option<Arc<MorphemeDictionary>> {
        self.cache
            .read()
            .ok()
            .and_then(|cache| cache.get(version).cloned())
    }
}
