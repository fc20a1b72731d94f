//! syntax/mod.rs
//! Language-neutral construct tree and its token encoding.
//!
//! Parsing a concrete language is outside this crate; front ends implement
//! `SourceFrontEnd` and hand over a `Node` tree.

pub mod decoder;
pub mod encoder;
pub mod types;

pub use decoder::StreamDecoder;
pub use encoder::{keys, StreamEncoder};
pub use crate::model::Span;
pub use types::{BinaryOperator, Node, ParsedSource, SourceFrontEnd, SpanTable, SyntaxError};
