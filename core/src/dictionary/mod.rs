//! Morpheme dictionary: versioned construct key → static code tables.

pub mod builtin;
pub mod types;
pub mod registry;

pub use types::{
    CodeTier, DictionaryEntry, DictionaryError, DictionarySchema, EntryEncoding,
    MorphemeDictionary,
};
pub use registry::{
    builtin_schema, canonical_dictionary_version, ensure_dictionary_supported, load_dictionary,
    DictionaryRegistry,
    DEFAULT_DICTIONARY_VERSION, SUPPORTED_DICTIONARY_VERSIONS,
};
