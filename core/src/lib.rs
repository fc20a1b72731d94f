//! qyn1-core
//!
//! Pure Rust codec for QYN1 packages: morpheme tokenisation, rANS entropy
//! coding, sectioned payload frames and passphrase-sealed envelopes.
//! No FFI, no global state beyond the shared dictionary registry.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod versioning;
pub mod limits;
pub mod config;

// Wire and model layers
pub mod framing;
pub mod dictionary;
pub mod model;
pub mod syntax;
pub mod compression;
pub mod crypto;

// Package pipeline
pub mod package;
pub mod migration;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{CompressionConfig, CompressionMode};
    pub use crate::config::{DecodeOptions, EncodeOptions};
    pub use crate::crypto::{AeadAlgorithm, KdfParameters};
    pub use crate::dictionary::{DictionaryRegistry, MorphemeDictionary};
    pub use crate::migration::{migrate_package, MigrationError, MigrationReport};
    pub use crate::model::{PayloadChannels, TokenStream};
    pub use crate::package::{
        decode_package, encode_package, encode_project, inspect_package, DecodedPackage,
        PackageInfo, PackageMetadata,
    };
    pub use crate::syntax::{Node, SourceFrontEnd, StreamDecoder, StreamEncoder};
    pub use crate::telemetry::counters::CodecCounters;
    pub use crate::types::PackageError;
    pub use crate::versioning::{Version, CURRENT_PACKAGE_VERSION};
}
