//! Path expression compiler for JSON-like trees
//!
//! Compiles query strings such as `$.store.book[0:2].title` into an
//! [`ExpressionNode`] tree that an evaluation engine can walk.
//!
//! ```
//! use jsonpath_compiler::{ExpressionNode, compile};
//!
//! let expr = compile("$.foo").unwrap();
//! assert_eq!(expr, ExpressionNode::child(ExpressionNode::Root, ExpressionNode::field("foo")));
//! assert_eq!(expr.to_string(), "$.foo");
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostics;
pub mod parser;

// Re-export main types
pub use ast::{BinaryOperator, ExpressionNode, FieldSelector, NodeKind, Precedence, Visitor};
pub use diagnostics::{Diagnostic, DiagnosticFormatter, Format};
pub use parser::{
    Compiler, ParseError, ParseResult, ParserConfig, Position, Token, TokenIter, TokenKind,
    TokenSource, compile, compile_tokens, compile_with, tokenize,
};
