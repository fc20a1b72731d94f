//! syntax/types.rs
//! Language-neutral construct tree and the front-end seam.

use std::fmt;

use serde_json::Value;

use crate::dictionary::DictionaryError;
use crate::model::{ModelError, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOperator {
    const ALL: [BinaryOperator; 19] = [
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Mod,
        BinaryOperator::Pow,
        BinaryOperator::Eq,
        BinaryOperator::NotEq,
        BinaryOperator::Lt,
        BinaryOperator::Gt,
        BinaryOperator::Le,
        BinaryOperator::Ge,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::BitAnd,
        BinaryOperator::BitOr,
        BinaryOperator::BitXor,
        BinaryOperator::ShiftLeft,
        BinaryOperator::ShiftRight,
    ];

    pub fn key(&self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Add => "op:add",
            Sub => "op:sub",
            Mul => "op:mul",
            Div => "op:div",
            Mod => "op:mod",
            Pow => "op:pow",
            Eq => "op:eq",
            NotEq => "op:neq",
            Lt => "op:lt",
            Gt => "op:gt",
            Le => "op:le",
            Ge => "op:ge",
            And => "op:and",
            Or => "op:or",
            BitAnd => "op:bit_and",
            BitOr => "op:bit_or",
            BitXor => "op:bit_xor",
            ShiftLeft => "op:shift_left",
            ShiftRight => "op:shift_right",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Module { body: Vec<Node> },
    FunctionDef {
        name: String,
        is_async: bool,
        params: Vec<String>,
        body: Vec<Node>,
    },
    Return { value: Option<Box<Node>> },
    Assign { targets: Vec<String>, value: Box<Node> },
    ExprStmt { value: Box<Node> },
    Import { names: Vec<String> },
    BinOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Call { func: Box<Node>, args: Vec<Node> },
    Name(String),
    Int(i64),
    Str(String),
    Bool(bool),
    NoneLiteral,
    /// Constant container literal (lists, maps) kept as structured data.
    Data(Value),
}

impl Node {
    /// Node type name recorded in source maps.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Module { .. } => "Module",
            Node::FunctionDef { is_async: false, .. } => "FunctionDef",
            Node::FunctionDef { is_async: true, .. } => "AsyncFunctionDef",
            Node::Return { .. } => "Return",
            Node::Assign { .. } => "Assign",
            Node::ExprStmt { .. } => "Expr",
            Node::Import { .. } => "Import",
            Node::BinOp { .. } => "BinOp",
            Node::Call { .. } => "Call",
            Node::Name(_) => "Name",
            Node::Int(_) | Node::Str(_) | Node::Bool(_) | Node::NoneLiteral | Node::Data(_) => {
                "Constant"
            }
        }
    }

    pub fn name(id: &str) -> Node {
        Node::Name(id.to_string())
    }

    pub fn binop(op: BinaryOperator, left: Node, right: Node) -> Node {
        Node::BinOp { op, left: Box::new(left), right: Box::new(right) }
    }

    /// Direct children in encoding order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Module { body } | Node::FunctionDef { body, .. } => body.iter().collect(),
            Node::Return { value } => value.iter().map(|v| v.as_ref()).collect(),
            Node::Assign { value, .. } | Node::ExprStmt { value } => vec![value.as_ref()],
            Node::BinOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::Call { func, args } => {
                std::iter::once(func.as_ref()).chain(args.iter()).collect()
            }
            Node::Import { .. }
            | Node::Name(_)
            | Node::Int(_)
            | Node::Str(_)
            | Node::Bool(_)
            | Node::NoneLiteral
            | Node::Data(_) => Vec::new(),
        }
    }

    /// All nodes in pre-order. A node's position here is its `SpanTable` index.
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().into_iter().rev());
        }
        out
    }
}

/// Spans for a tree, indexed by pre-order node position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanTable {
    spans: Vec<Option<Span>>,
}

impl SpanTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, span: Span) {
        if index >= self.spans.len() {
            self.spans.resize(index + 1, None);
        }
        self.spans[index] = Some(span);
    }

    pub fn get(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.spans.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed tree plus whatever spans the front end could attach.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    pub tree: Node,
    pub spans: SpanTable,
}

#[derive(Debug)]
pub enum SyntaxError {
    Dictionary(DictionaryError),
    Model(ModelError),
    UnexpectedToken { position: usize, expected: String, found: String },
    UnexpectedEnd { expected: String },
    DictionaryMismatch { stream: String, dictionary: String },
    Parse(String),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SyntaxError::*;
        match self {
            Dictionary(e) => write!(f, "{}", e),
            Model(e) => write!(f, "{}", e),
            UnexpectedToken { position, expected, found } =>
                write!(f, "token {}: expected {} but found '{}'", position, expected, found),
            UnexpectedEnd { expected } => write!(f, "stream ended while expecting {}", expected),
            DictionaryMismatch { stream, dictionary } =>
                write!(f, "stream uses dictionary {} but decoder has {}", stream, dictionary),
            Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<DictionaryError> for SyntaxError {
    fn from(e: DictionaryError) -> Self {
        SyntaxError::Dictionary(e)
    }
}

impl From<ModelError> for SyntaxError {
    fn from(e: ModelError) -> Self {
        SyntaxError::Model(e)
    }
}

/// Source-language parser plugged in front of the stream encoder.
pub trait SourceFrontEnd: Send + Sync {
    fn language(&self) -> &str;
    fn language_version(&self) -> &str;
    fn parse(&self, source: &str) -> Result<Node, SyntaxError>;

    /// Front ends that track positions override this; the default has no spans.
    fn parse_with_spans(&self, source: &str) -> Result<ParsedSource, SyntaxError> {
        Ok(ParsedSource { tree: self.parse(source)?, spans: SpanTable::default() })
    }
}
