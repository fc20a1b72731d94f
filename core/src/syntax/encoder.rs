//! syntax/encoder.rs
//! Construct tree to token stream.

use std::sync::Arc;

use tracing::debug;

use crate::dictionary::MorphemeDictionary;
use crate::model::{SourceMapBuilder, Span, TokenStream};
use crate::syntax::types::{Node, SourceFrontEnd, SpanTable, SyntaxError};

pub mod keys {
    pub const STREAM_START: &str = "meta:stream_start";
    pub const STREAM_END: &str = "meta:stream_end";
    pub const VERSION_HEADER: &str = "meta:version_header";
    pub const DICTIONARY_VERSION: &str = "meta:dictionary_version";
    pub const MODULE: &str = "construct:module";
    pub const FUNCTION: &str = "construct:function";
    pub const ASYNC_FUNCTION: &str = "construct:async_function";
    pub const PARAMETER: &str = "structure:parameter";
    pub const IDENTIFIER: &str = "structure:identifier";
    pub const RETURN: &str = "flow:return";
    pub const ASSIGN: &str = "op:assign";
    pub const EXPR_STMT: &str = "structure:line";
    pub const IMPORT: &str = "construct:import";
    pub const CALL: &str = "op:call";
    pub const INT: &str = "literal:int";
    pub const STRING: &str = "literal:string";
    pub const TRUE: &str = "literal:bool_true";
    pub const FALSE: &str = "literal:bool_false";
    pub const NULL: &str = "literal:null";
    pub const DATA: &str = "literal:object";
}

pub struct StreamEncoder {
    dictionary: Arc<MorphemeDictionary>,
    strict: bool,
    include_source_map: bool,
}

struct EncodeState<'d> {
    dictionary: &'d MorphemeDictionary,
    strict: bool,
    stream: TokenStream,
    source_map: Option<SourceMapBuilder>,
    spans: &'d SpanTable,
    /// Pre-order position of the next node visited.
    next_node: usize,
    span: Option<Span>,
}

impl StreamEncoder {
    pub fn new(dictionary: Arc<MorphemeDictionary>) -> Self {
        Self { dictionary, strict: true, include_source_map: false }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_source_map(mut self, include: bool) -> Self {
        self.include_source_map = include;
        self
    }

    pub fn dictionary(&self) -> &MorphemeDictionary {
        &self.dictionary
    }

    /// Parse `source` with `front_end` and encode the result.
    pub fn encode_source(
        &self,
        front_end: &dyn SourceFrontEnd,
        source: &str,
    ) -> Result<TokenStream, SyntaxError> {
        let parsed = front_end.parse_with_spans(source)?;
        self.encode_with_spans(
            &parsed.tree,
            &parsed.spans,
            source.as_bytes(),
            front_end.language(),
            front_end.language_version(),
        )
    }

    pub fn encode(
        &self,
        tree: &Node,
        source: &[u8],
        language: &str,
        language_version: &str,
    ) -> Result<TokenStream, SyntaxError> {
        self.encode_with_spans(tree, &SpanTable::default(), source, language, language_version)
    }

    /// Like `encode`, recording `spans` in the source map when one is built.
    pub fn encode_with_spans(
        &self,
        tree: &Node,
        spans: &SpanTable,
        source: &[u8],
        language: &str,
        language_version: &str,
    ) -> Result<TokenStream, SyntaxError> {
        let stream = TokenStream::new(self.dictionary.version(), language, language_version)
            .with_source(source);
        let mut state = EncodeState {
            dictionary: &self.dictionary,
            strict: self.strict,
            stream,
            source_map: self.include_source_map.then(SourceMapBuilder::new),
            spans,
            next_node: 0,
            span: None,
        };

        state.emit(keys::STREAM_START, None)?;
        let at = state.emit(keys::VERSION_HEADER, None)?;
        let encoder_version = state.stream.encoder_version.clone();
        state
            .stream
            .payloads
            .append_string("encoder_version", encoder_version, None, Some(at));
        let at = state.emit(keys::DICTIONARY_VERSION, None)?;
        let dictionary_version = state.stream.dictionary_version.clone();
        state
            .stream
            .payloads
            .append_string("dictionary_version", dictionary_version, None, Some(at));

        match tree {
            Node::Module { .. } => state.node(tree)?,
            other => {
                let msg = format!("root must be a module, got {}", other.kind());
                return Err(SyntaxError::Parse(msg));
            }
        }
        state.emit(keys::STREAM_END, None)?;

        let EncodeState { mut stream, source_map, .. } = state;
        if let Some(builder) = source_map {
            let map = builder.build(
                &stream.source_hash,
                &stream.dictionary_version,
                &stream.encoder_version,
            );
            stream.source_map = Some(map);
        }
        debug!(tokens = stream.tokens.len(), payloads = stream.payloads.len(), "stream encoded");
        Ok(stream)
    }
}

impl<'d> EncodeState<'d> {
    fn emit(&mut self, key: &str, node: Option<&Node>) -> Result<u32, SyntaxError> {
        let index = self.dictionary.index_for_key(key, self.strict)? as u32;
        let position = self.stream.tokens.len() as u32;
        self.stream.tokens.push(index);
        if let Some(builder) = self.source_map.as_mut() {
            builder.record(position, key, node.map(Node::kind), node.and(self.span));
        }
        Ok(position)
    }

    fn block(&mut self, body: &[Node]) -> Result<(), SyntaxError> {
        body.iter().try_for_each(|n| self.node(n))
    }

    fn node(&mut self, node: &Node) -> Result<(), SyntaxError> {
        let span = self.spans.get(self.next_node);
        self.next_node += 1;
        let outer = std::mem::replace(&mut self.span, span);
        let result = self.visit(node);
        self.span = outer;
        result
    }

    fn visit(&mut self, node: &Node) -> Result<(), SyntaxError> {
        match node {
            Node::Module { body } => {
                let at = self.emit(keys::MODULE, Some(node))?;
                let payloads = &mut self.stream.payloads;
                payloads.append_count("module_body_length", body.len() as u64, Some(at));
                self.block(body)
            }
            Node::FunctionDef { name, is_async, params, body } => {
                let key = if *is_async { keys::ASYNC_FUNCTION } else { keys::FUNCTION };
                let at = self.emit(key, Some(node))?;
                let payloads = &mut self.stream.payloads;
                payloads.append_identifier("function_name", name.as_str(), Some(at));
                payloads.append_flag("function_async", *is_async, Some(at));
                payloads.append_count("function_arg_count", params.len() as u64, Some(at));
                for param in params {
                    let p = self.emit(keys::PARAMETER, Some(node))?;
                    self.stream
                        .payloads
                        .append_identifier("parameter_name", param.as_str(), Some(p));
                }
                self.stream
                    .payloads
                    .append_count("function_body_length", body.len() as u64, Some(at));
                self.block(body)
            }
            Node::Return { value } => {
                let at = self.emit(keys::RETURN, Some(node))?;
                self.stream.payloads.append_flag("return_has_value", value.is_some(), Some(at));
                match value {
                    Some(v) => self.node(v),
                    None => Ok(()),
                }
            }
            Node::Assign { targets, value } => {
                let at = self.emit(keys::ASSIGN, Some(node))?;
                let payloads = &mut self.stream.payloads;
                payloads.append_count("assign_target_count", targets.len() as u64, Some(at));
                for target in targets {
                    let t = self.emit(keys::IDENTIFIER, Some(node))?;
                    self.stream
                        .payloads
                        .append_identifier("identifier_name", target.as_str(), Some(t));
                }
                self.node(value)
            }
            Node::ExprStmt { value } => {
                self.emit(keys::EXPR_STMT, Some(node))?;
                self.node(value)
            }
            Node::Import { names } => {
                let at = self.emit(keys::IMPORT, Some(node))?;
                let payloads = &mut self.stream.payloads;
                payloads.append_count("import_name_count", names.len() as u64, Some(at));
                for name in names {
                    payloads.append_identifier("import_name", name.as_str(), Some(at));
                }
                Ok(())
            }
            Node::BinOp { op, left, right } => {
                self.emit(op.key(), Some(node))?;
                self.node(left)?;
                self.node(right)
            }
            Node::Call { func, args } => {
                let at = self.emit(keys::CALL, Some(node))?;
                self.stream.payloads.append_count("call_arg_count", args.len() as u64, Some(at));
                self.node(func)?;
                self.block(args)
            }
            Node::Name(id) => {
                let at = self.emit(keys::IDENTIFIER, Some(node))?;
                self.stream.payloads.append_identifier("identifier_name", id.as_str(), Some(at));
                Ok(())
            }
            Node::Int(v) => {
                let at = self.emit(keys::INT, Some(node))?;
                self.stream.payloads.append_number("literal", *v, Some("int"), Some(at));
                Ok(())
            }
            Node::Str(v) => {
                let at = self.emit(keys::STRING, Some(node))?;
                self.stream.payloads.append_string("literal", v.as_str(), Some("str"), Some(at));
                Ok(())
            }
            Node::Bool(v) => {
                self.emit(if *v { keys::TRUE } else { keys::FALSE }, Some(node))?;
                Ok(())
            }
            Node::NoneLiteral => {
                self.emit(keys::NULL, Some(node))?;
                Ok(())
            }
            Node::Data(value) => {
                let at = self.emit(keys::DATA, Some(node))?;
                self.stream.payloads.append_structured("literal_data", value.clone(), Some(at));
                Ok(())
            }
        }
    }
}
