//! Precedence-climbing parser for path expressions
//!
//! The parser pulls tokens one at a time from a [`TokenSource`] and never
//! looks further ahead than the current token. Binding strength comes from
//! [`Precedence`]; every binary operator is left-associative, so right
//! operands are parsed one level tighter than the operator itself.

use super::config::ParserConfig;
use super::error::{ParseError, ParseResult};
use super::lexer::TokenSource;
use super::span::{Position, Spanned};
use super::tokenizer::{Token, TokenKind, Tokenizer};
use crate::ast::{BinaryOperator, ExpressionNode, FieldSelector, Precedence};
use smallvec::SmallVec;

/// Get the binding strength of a token in operator position
#[inline(always)]
fn get_precedence(token: &Token<'_>) -> Option<Precedence> {
    match token {
        Token::Dot | Token::LeftBracket => Some(Precedence::Child),
        Token::Where => Some(Precedence::Where),
        Token::Ampersand => Some(Precedence::Intersect),
        Token::Pipe => Some(Precedence::Union),
        Token::DoubleDot => Some(Precedence::Descendants),
        _ => None,
    }
}

/// Map an infix token to its operator
#[inline(always)]
fn token_to_binary_op(token: &Token<'_>) -> Option<BinaryOperator> {
    match token {
        Token::Dot => Some(BinaryOperator::Child),
        Token::DoubleDot => Some(BinaryOperator::Descendants),
        Token::Where => Some(BinaryOperator::Where),
        Token::Pipe => Some(BinaryOperator::Union),
        Token::Ampersand => Some(BinaryOperator::Intersect),
        _ => None,
    }
}

/// Precedence-climbing parser over any token source
pub struct PrattParser<'input, S> {
    source: S,
    current: Option<Spanned<Token<'input>>>,
    last_end: Position,
    exhausted: bool,
    depth: usize,
    tokens_consumed: usize,
    config: ParserConfig,
}

impl<'input> PrattParser<'input, Tokenizer<'input>> {
    /// Create a parser over source text using the default tokenizer
    pub fn from_text(input: &'input str) -> Self {
        Self::new(Tokenizer::new(input))
    }
}

impl<'input, S: TokenSource<'input>> PrattParser<'input, S> {
    /// Create a parser with the default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    /// Create a parser with an explicit configuration
    pub fn with_config(source: S, config: ParserConfig) -> Self {
        Self {
            source,
            current: None,
            last_end: Position::start(),
            exhausted: false,
            depth: 0,
            tokens_consumed: 0,
            config,
        }
    }

    /// Number of tokens consumed so far
    pub fn tokens_consumed(&self) -> usize {
        self.tokens_consumed
    }

    /// Move to the next token, returning the one just passed
    #[inline]
    fn advance(&mut self) -> ParseResult<Option<Spanned<Token<'input>>>> {
        let previous = self.current.take();
        if let Some(token) = &previous {
            self.last_end = token.end;
            self.tokens_consumed += 1;
        }
        if !self.exhausted {
            self.current = self.source.next_token()?;
            self.exhausted = self.current.is_none();
        }
        Ok(previous)
    }

    #[inline(always)]
    fn current(&self) -> Option<&Token<'input>> {
        self.current.as_ref().map(|token| &token.value)
    }

    fn unexpected(token: &Spanned<Token<'_>>) -> ParseError {
        ParseError::UnexpectedToken {
            kind: token.value.kind(),
            value: token.value.to_string(),
            position: token.start,
            end: token.end,
        }
    }

    fn end_of_input(&self) -> ParseError {
        ParseError::UnexpectedEndOfInput {
            position: self.last_end,
        }
    }

    /// Error for whatever the current token is
    fn reject_current(&self) -> ParseError {
        match &self.current {
            Some(token) => Self::unexpected(token),
            None => self.end_of_input(),
        }
    }

    /// Consume a token of the expected kind
    fn expect(&mut self, expected: TokenKind) -> ParseResult<Spanned<Token<'input>>> {
        match &self.current {
            Some(token) if token.value.kind() == expected => {
                self.advance()?.ok_or_else(|| self.end_of_input())
            }
            _ => Err(self.reject_current()),
        }
    }

    /// Consume an integer literal if one is next
    fn maybe_int(&mut self) -> ParseResult<Option<i64>> {
        match self.current() {
            Some(Token::Number(value)) => {
                let value = *value;
                self.advance()?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    /// Parse `ID (',' ID)*`; the current token is the first identifier
    fn parse_field_list(&mut self) -> ParseResult<FieldSelector> {
        let mut names: SmallVec<[String; 2]> = SmallVec::new();
        loop {
            match self.advance()? {
                Some(Spanned {
                    value: Token::Identifier(name),
                    ..
                }) => names.push(name.into_owned()),
                Some(token) => return Err(Self::unexpected(&token)),
                None => return Err(self.end_of_input()),
            }

            if !matches!(self.current(), Some(Token::Comma)) {
                break;
            }
            self.advance()?;
            if !matches!(self.current(), Some(Token::Identifier(_))) {
                return Err(self.reject_current());
            }
        }
        Ok(FieldSelector::Names(names))
    }

    /// Parse the inside of `[...]`; the opening bracket is already consumed
    fn parse_bracket(&mut self) -> ParseResult<ExpressionNode> {
        let node = match self.current() {
            Some(Token::Star) => {
                self.advance()?;
                ExpressionNode::full_slice()
            }
            Some(Token::Identifier(_)) => ExpressionNode::Fields(self.parse_field_list()?),
            Some(Token::Number(value)) => {
                let value = *value;
                self.advance()?;
                if matches!(self.current(), Some(Token::Colon)) {
                    self.parse_slice(Some(value))?
                } else {
                    ExpressionNode::index(value)
                }
            }
            Some(Token::Colon) => self.parse_slice(None)?,
            _ => return Err(self.reject_current()),
        };
        self.expect(TokenKind::RightBracket)?;
        Ok(node)
    }

    /// Parse `':' maybe_int (':' maybe_int)?` after the slice start
    fn parse_slice(&mut self, start: Option<i64>) -> ParseResult<ExpressionNode> {
        self.expect(TokenKind::Colon)?;
        let end = self.maybe_int()?;
        let step = if matches!(self.current(), Some(Token::Colon)) {
            self.advance()?;
            self.maybe_int()?
        } else {
            None
        };
        Ok(ExpressionNode::slice(start, end, step))
    }

    /// Parse primary expression: `$`, `(expr)`, named operator, field list or bracket
    ///
    /// Returns the node with its tree depth.
    fn parse_primary(&mut self) -> ParseResult<(ExpressionNode, usize)> {
        let Some(token) = &self.current else {
            return Err(self.end_of_input());
        };

        let node = match &token.value {
            Token::Dollar => {
                self.advance()?;
                ExpressionNode::Root
            }
            Token::Identifier(_) => ExpressionNode::Fields(self.parse_field_list()?),
            Token::Star => {
                self.advance()?;
                ExpressionNode::wildcard()
            }
            Token::NamedOperator(name) => {
                let node = match name.as_ref() {
                    "this" => ExpressionNode::This,
                    "parent" => ExpressionNode::Parent,
                    other => {
                        return Err(ParseError::UnknownNamedOperator {
                            name: other.to_string(),
                            position: token.start,
                        });
                    }
                };
                self.advance()?;
                node
            }
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_expression_with_precedence(Precedence::lowest())?;
                self.expect(TokenKind::RightParen)?;
                return Ok(inner);
            }
            Token::LeftBracket => {
                self.advance()?;
                self.parse_bracket()?
            }
            _ => return Err(Self::unexpected(token)),
        };
        Ok((node, 1))
    }

    /// Parse expression using precedence climbing
    fn parse_expression_with_precedence(
        &mut self,
        min_precedence: Precedence,
    ) -> ParseResult<(ExpressionNode, usize)> {
        if self.depth >= self.config.max_depth {
            return Err(self.too_deep(
                self.current
                    .as_ref()
                    .map_or(self.last_end, |token| token.start),
            ));
        }

        self.depth += 1;
        let result = self.parse_operators(min_precedence);
        self.depth -= 1;
        result
    }

    fn too_deep(&self, position: Position) -> ParseError {
        ParseError::NestingTooDeep {
            limit: self.config.max_depth,
            position,
        }
    }

    /// Fold operators onto the left operand while they bind at least `min_precedence`
    ///
    /// Left-associative chains grow the tree without recursing, so the tree
    /// depth is checked here as well as the recursion depth.
    fn parse_operators(
        &mut self,
        min_precedence: Precedence,
    ) -> ParseResult<(ExpressionNode, usize)> {
        let (mut left, mut depth) = self.parse_primary()?;

        while let Some(current_token) = self.current() {
            let precedence = match get_precedence(current_token) {
                Some(prec) if prec.as_u8() >= min_precedence.as_u8() => prec,
                _ => break,
            };
            let operator_start = self
                .current
                .as_ref()
                .map_or(self.last_end, |token| token.start);

            // Postfix brackets bind like '.', with the bracket body as the right side
            if matches!(current_token, Token::LeftBracket) {
                log::trace!("postfix bracket at {precedence:?}");
                if depth >= self.config.max_depth {
                    return Err(self.too_deep(operator_start));
                }
                self.advance()?;
                let right = self.parse_bracket()?;
                left = ExpressionNode::child(left, right);
                depth += 1;
                continue;
            }

            let Some(op) = token_to_binary_op(current_token) else {
                break;
            };
            log::trace!("binary {op:?} at {precedence:?} (min {min_precedence:?})");
            self.advance()?;

            let (right, right_depth) =
                self.parse_expression_with_precedence(precedence.next_level())?;
            depth = 1 + depth.max(right_depth);
            if depth > self.config.max_depth {
                return Err(self.too_deep(operator_start));
            }
            left = op.build(left, right);
        }

        Ok((left, depth))
    }

    /// Parse one expression, leaving any following tokens in place
    pub fn parse_expression(&mut self) -> ParseResult<ExpressionNode> {
        if self.current.is_none() && !self.exhausted {
            self.advance()?;
        }
        self.parse_expression_with_precedence(Precedence::lowest())
            .map(|(expr, _)| expr)
    }

    /// Parse complete input
    pub fn parse(&mut self) -> ParseResult<ExpressionNode> {
        let expr = self.parse_expression()?;

        // Ensure we consumed all input
        if let Some(token) = &self.current {
            return Err(Self::unexpected(token));
        }

        Ok(expr)
    }
}

/// Parse source text with the default tokenizer and configuration
#[inline]
pub fn parse_expression_pratt(input: &str) -> ParseResult<ExpressionNode> {
    PrattParser::from_text(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenIter;

    fn fields(names: &[&str]) -> ExpressionNode {
        ExpressionNode::fields(names.iter().copied())
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::Child > Precedence::Where);
        assert!(Precedence::Where > Precedence::Intersect);
        assert!(Precedence::Intersect > Precedence::Union);
        assert!(Precedence::Union > Precedence::Descendants);
    }

    #[test]
    fn test_basic_expressions() {
        assert_eq!(parse_expression_pratt("$").unwrap(), ExpressionNode::Root);
        assert_eq!(
            parse_expression_pratt("$.foo").unwrap(),
            ExpressionNode::child(ExpressionNode::Root, fields(&["foo"]))
        );
        assert_eq!(
            parse_expression_pratt("a,b,c").unwrap(),
            fields(&["a", "b", "c"])
        );
        assert_eq!(
            parse_expression_pratt("*").unwrap(),
            ExpressionNode::wildcard()
        );
    }

    #[test]
    fn test_associativity() {
        let result = parse_expression_pratt("a.b.c").unwrap();
        assert_eq!(
            result,
            ExpressionNode::child(
                ExpressionNode::child(fields(&["a"]), fields(&["b"])),
                fields(&["c"])
            )
        );

        let result = parse_expression_pratt("a|b|c").unwrap();
        assert_eq!(
            result,
            ExpressionNode::union(
                ExpressionNode::union(fields(&["a"]), fields(&["b"])),
                fields(&["c"])
            )
        );
    }

    #[test]
    fn test_mixed_precedence() {
        let result = parse_expression_pratt("a|b.c").unwrap();
        assert_eq!(
            result,
            ExpressionNode::union(
                fields(&["a"]),
                ExpressionNode::child(fields(&["b"]), fields(&["c"]))
            )
        );

        let result = parse_expression_pratt("a.b where c.d").unwrap();
        assert_eq!(
            result,
            ExpressionNode::filter(
                ExpressionNode::child(fields(&["a"]), fields(&["b"])),
                ExpressionNode::child(fields(&["c"]), fields(&["d"]))
            )
        );

        let result = parse_expression_pratt("a..b&c").unwrap();
        assert_eq!(
            result,
            ExpressionNode::descendants(
                fields(&["a"]),
                ExpressionNode::intersect(fields(&["b"]), fields(&["c"]))
            )
        );
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            parse_expression_pratt("a[0]").unwrap(),
            parse_expression_pratt("a.[0]").unwrap()
        );
        assert_eq!(
            parse_expression_pratt("a.b[-1]").unwrap(),
            ExpressionNode::child(
                ExpressionNode::child(fields(&["a"]), fields(&["b"])),
                ExpressionNode::index(-1)
            )
        );
        assert_eq!(
            parse_expression_pratt("[*]").unwrap(),
            ExpressionNode::full_slice()
        );
        assert_eq!(
            parse_expression_pratt("[1:]").unwrap(),
            ExpressionNode::slice(Some(1), None, None)
        );
        assert_eq!(
            parse_expression_pratt("[::2]").unwrap(),
            ExpressionNode::slice(None, None, Some(2))
        );
        assert_eq!(
            parse_expression_pratt("[1:5:2]").unwrap(),
            ExpressionNode::slice(Some(1), Some(5), Some(2))
        );
        assert_eq!(
            parse_expression_pratt("x['a',b]").unwrap(),
            ExpressionNode::child(fields(&["x"]), fields(&["a", "b"]))
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let result = parse_expression_pratt("(a|b).c").unwrap();
        assert_eq!(
            result,
            ExpressionNode::child(
                ExpressionNode::union(fields(&["a"]), fields(&["b"])),
                fields(&["c"])
            )
        );
    }

    #[test]
    fn test_named_operators() {
        assert_eq!(parse_expression_pratt("`this`").unwrap(), ExpressionNode::This);
        assert_eq!(parse_expression_pratt("parent").unwrap(), ExpressionNode::Parent);

        let err = parse_expression_pratt("a.`foo`").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownNamedOperator {
                name: "foo".to_string(),
                position: Position::new(1, 3, 2),
            }
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_expression_pratt("$.").unwrap_err(),
            ParseError::UnexpectedEndOfInput {
                position: Position::new(1, 3, 2),
            }
        );
        assert_eq!(
            parse_expression_pratt("").unwrap_err(),
            ParseError::UnexpectedEndOfInput {
                position: Position::start(),
            }
        );
        assert_eq!(
            parse_expression_pratt("a]").unwrap_err(),
            ParseError::UnexpectedToken {
                kind: TokenKind::RightBracket,
                value: "]".to_string(),
                position: Position::new(1, 2, 1),
                end: Position::new(1, 3, 2),
            }
        );
        assert!(matches!(
            parse_expression_pratt("a[0").unwrap_err(),
            ParseError::UnexpectedEndOfInput { .. }
        ));
        assert!(matches!(
            parse_expression_pratt("a,").unwrap_err(),
            ParseError::UnexpectedEndOfInput { .. }
        ));
        assert!(matches!(
            parse_expression_pratt("a,*").unwrap_err(),
            ParseError::UnexpectedToken {
                kind: TokenKind::Star,
                ..
            }
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let input = format!("{}a{}", "(".repeat(10), ")".repeat(10));
        let config = ParserConfig::default().with_max_depth(5);
        let err = PrattParser::with_config(Tokenizer::new(&input), config)
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::NestingTooDeep { limit: 5, .. }));

        let config = ParserConfig::default().with_max_depth(11);
        assert!(
            PrattParser::with_config(Tokenizer::new(&input), config)
                .parse()
                .is_ok()
        );
    }

    #[test]
    fn test_left_chains_count_against_depth() {
        let config = ParserConfig::default().with_max_depth(3);
        let parse = |input: &str| PrattParser::with_config(Tokenizer::new(input), config).parse();

        assert_eq!(parse("a.b.c").unwrap().depth(), 3);
        assert_eq!(parse("a[0][1]").unwrap().depth(), 3);
        assert_eq!(
            parse("a.b.c.d").unwrap_err(),
            ParseError::NestingTooDeep {
                limit: 3,
                position: Position::new(1, 6, 5),
            }
        );
        assert_eq!(
            parse("a[0][1][2]").unwrap_err(),
            ParseError::NestingTooDeep {
                limit: 3,
                position: Position::new(1, 8, 7),
            }
        );
        assert!(matches!(
            parse("a|b|c|d").unwrap_err(),
            ParseError::NestingTooDeep { limit: 3, .. }
        ));
        // Balanced trees are bounded by their height, not their size
        assert!(parse("a.b|c.d").is_ok());
    }

    #[test]
    fn test_hand_built_tokens() {
        let source = TokenIter::from_tokens([
            Token::Dollar,
            Token::DoubleDot,
            Token::identifier("name"),
        ]);
        let mut parser = PrattParser::new(source);
        assert_eq!(
            parser.parse().unwrap(),
            ExpressionNode::descendants(ExpressionNode::Root, fields(&["name"]))
        );
        assert_eq!(parser.tokens_consumed(), 3);
    }
}
