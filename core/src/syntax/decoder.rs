//! syntax/decoder.rs
//! Token stream back to the construct tree.

use std::sync::Arc;

use crate::dictionary::MorphemeDictionary;
use crate::model::{PayloadCursor, TokenStream};
use crate::syntax::encoder::keys;
use crate::syntax::types::{BinaryOperator, Node, SyntaxError};

pub struct StreamDecoder {
    dictionary: Arc<MorphemeDictionary>,
}

struct DecodeState<'a> {
    keys: Vec<&'a str>,
    position: usize,
    cursor: PayloadCursor<'a>,
}

impl StreamDecoder {
    pub fn new(dictionary: Arc<MorphemeDictionary>) -> Self {
        Self { dictionary }
    }

    pub fn decode(&self, stream: &TokenStream) -> Result<Node, SyntaxError> {
        if stream.dictionary_version != self.dictionary.version() {
            return Err(SyntaxError::DictionaryMismatch {
                stream: stream.dictionary_version.clone(),
                dictionary: self.dictionary.version().to_string(),
            });
        }
        let keys = stream
            .tokens
            .iter()
            .map(|t| self.dictionary.entry_for_index(*t as usize).map(|e| e.key.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = DecodeState {
            keys,
            position: 0,
            cursor: stream.payloads.cursor(),
        };
        state.expect(keys::STREAM_START)?;
        state.expect(keys::VERSION_HEADER)?;
        state.cursor.string("encoder_version", None)?;
        state.expect(keys::DICTIONARY_VERSION)?;
        state.cursor.string("dictionary_version", None)?;

        state.expect(keys::MODULE)?;
        let length = state.cursor.count("module_body_length")?;
        let body = state.block(length)?;

        state.expect(keys::STREAM_END)?;
        if state.position != state.keys.len() {
            return Err(SyntaxError::UnexpectedToken {
                position: state.position,
                expected: "end of stream".into(),
                found: state.keys[state.position].to_string(),
            });
        }
        state.cursor.finish()?;
        Ok(Node::Module { body })
    }
}

impl<'a> DecodeState<'a> {
    fn next(&mut self, expected: &str) -> Result<&'a str, SyntaxError> {
        let key = self
            .keys
            .get(self.position)
            .copied()
            .ok_or_else(|| SyntaxError::UnexpectedEnd { expected: expected.to_string() })?;
        self.position += 1;
        Ok(key)
    }

    fn expect(&mut self, key: &str) -> Result<(), SyntaxError> {
        let found = self.next(key)?;
        if found != key {
            return Err(SyntaxError::UnexpectedToken {
                position: self.position - 1,
                expected: key.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn block(&mut self, length: u64) -> Result<Vec<Node>, SyntaxError> {
        (0..length).map(|_| self.statement()).collect()
    }

    fn statement(&mut self) -> Result<Node, SyntaxError> {
        let key = self.next("a statement")?;
        match key {
            keys::FUNCTION | keys::ASYNC_FUNCTION => {
                let name = self.cursor.identifier("function_name")?.to_string();
                let is_async = self.cursor.flag("function_async")?;
                let arg_count = self.cursor.count("function_arg_count")?;
                let mut params = Vec::new();
                for _ in 0..arg_count {
                    self.expect(keys::PARAMETER)?;
                    params.push(self.cursor.identifier("parameter_name")?.to_string());
                }
                let body_length = self.cursor.count("function_body_length")?;
                let body = self.block(body_length)?;
                Ok(Node::FunctionDef { name, is_async, params, body })
            }
            keys::RETURN => {
                let value = if self.cursor.flag("return_has_value")? {
                    Some(Box::new(self.expression()?))
                } else {
                    None
                };
                Ok(Node::Return { value })
            }
            keys::ASSIGN => {
                let count = self.cursor.count("assign_target_count")?;
                let mut targets = Vec::new();
                for _ in 0..count {
                    self.expect(keys::IDENTIFIER)?;
                    targets.push(self.cursor.identifier("identifier_name")?.to_string());
                }
                let value = Box::new(self.expression()?);
                Ok(Node::Assign { targets, value })
            }
            keys::EXPR_STMT => Ok(Node::ExprStmt { value: Box::new(self.expression()?) }),
            keys::IMPORT => {
                let count = self.cursor.count("import_name_count")?;
                let names = (0..count)
                    .map(|_| self.cursor.identifier("import_name").map(str::to_string))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Node::Import { names })
            }
            other => Err(SyntaxError::UnexpectedToken {
                position: self.position - 1,
                expected: "a statement".into(),
                found: other.to_string(),
            }),
        }
    }

    fn expression(&mut self) -> Result<Node, SyntaxError> {
        let key = self.next("an expression")?;
        if let Some(op) = BinaryOperator::from_key(key) {
            let left = self.expression()?;
            let right = self.expression()?;
            return Ok(Node::binop(op, left, right));
        }
        match key {
            keys::IDENTIFIER => {
                Ok(Node::Name(self.cursor.identifier("identifier_name")?.to_string()))
            }
            keys::CALL => {
                let count = self.cursor.count("call_arg_count")?;
                let func = Box::new(self.expression()?);
                let args = (0..count).map(|_| self.expression()).collect::<Result<Vec<_>, _>>()?;
                Ok(Node::Call { func, args })
            }
            keys::INT => Ok(Node::Int(self.cursor.number("literal", Some("int"))?)),
            keys::STRING => {
                Ok(Node::Str(self.cursor.string("literal", Some("str"))?.0.to_string()))
            }
            keys::TRUE => Ok(Node::Bool(true)),
            keys::FALSE => Ok(Node::Bool(false)),
            keys::NULL => Ok(Node::NoneLiteral),
            keys::DATA => Ok(Node::Data(self.cursor.structured("literal_data")?.clone())),
            other => Err(SyntaxError::UnexpectedToken {
                position: self.position - 1,
                expected: "an expression".into(),
                found: other.to_string(),
            }),
        }
    }
}
