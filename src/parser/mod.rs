//! Path expression parser
//!
//! Turns path expression text, or any [`TokenSource`], into an
//! [`ExpressionNode`] tree with a hand-written precedence-climbing parser.

pub mod config;
pub mod error;
pub mod lexer;
pub mod pratt;
pub mod span;
pub mod tokenizer;

pub use config::ParserConfig;
pub use error::{ParseError, ParseResult};
pub use lexer::{TokenIter, TokenSource};
pub use pratt::{PrattParser, parse_expression_pratt};
pub use span::{Position, Spanned};
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};

use crate::ast::ExpressionNode;

/// Compile a path expression with the default configuration
pub fn compile(input: &str) -> ParseResult<ExpressionNode> {
    compile_with(input, &ParserConfig::default())
}

/// Compile a path expression with an explicit configuration
pub fn compile_with(input: &str, config: &ParserConfig) -> ParseResult<ExpressionNode> {
    Compiler::new(*config).compile(input)
}

/// Compile an already tokenized expression
pub fn compile_tokens<'input, S: TokenSource<'input>>(source: S) -> ParseResult<ExpressionNode> {
    Compiler::default().compile_tokens(source)
}

/// Reusable compiler holding a [`ParserConfig`]
///
/// Stateless between calls; one instance can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compiler {
    config: ParserConfig,
}

impl Compiler {
    /// Create a compiler with the given configuration
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The configuration used for every compile
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Compile source text using the default tokenizer
    pub fn compile(&self, input: &str) -> ParseResult<ExpressionNode> {
        log::debug!("compiling path expression ({} bytes)", input.len());
        self.compile_tokens(Tokenizer::new(input))
    }

    /// Compile tokens pulled from any source
    pub fn compile_tokens<'input, S: TokenSource<'input>>(
        &self,
        source: S,
    ) -> ParseResult<ExpressionNode> {
        let mut parser = PrattParser::with_config(source, self.config);
        match parser.parse() {
            Ok(expr) => {
                log::debug!(
                    "compiled {} tokens into {} nodes",
                    parser.tokens_consumed(),
                    expr.node_count()
                );
                Ok(expr)
            }
            Err(err) => {
                log::debug!("compile failed: {err}");
                Err(err)
            }
        }
    }
}
