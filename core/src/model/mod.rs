//! model/mod.rs
//! Token streams and the auxiliary data carried beside them.
//!
//! Design notes:
//! - A token is a dictionary index; everything else (names, literals,
//!   counts) rides in typed payload channels.
//! - The source map, when present, has exactly one mapping per token.

pub mod payload;
pub mod source_map;
pub mod stream;
pub mod string_table;
pub mod types;

pub use payload::{PayloadChannel, PayloadChannels, PayloadCursor, PayloadEntry, PayloadValue};
pub use source_map::{SourceMap, SourceMapBuilder, SourceMapEntry, Span};
pub use stream::{KeyManagement, TokenStream};
pub use string_table::{StringTable, StringTableEntry};
pub use types::ModelError;
