//! Parser error types

use super::span::Position;
use super::tokenizer::TokenKind;
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location information
///
/// Every error ends the compile call; nothing is recovered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token that fits no production at this point
    #[error("Parse error at {position} near token {value} ({kind})")]
    UnexpectedToken {
        /// Category of the offending token
        kind: TokenKind,
        /// Source value of the offending token
        value: String,
        /// Position where the token starts
        position: Position,
        /// Position just past the token
        end: Position,
    },

    /// The token stream ended inside an incomplete expression
    #[error("Parse error near the end of input at {position}")]
    UnexpectedEndOfInput {
        /// Position just past the last token
        position: Position,
    },

    /// A named operator other than `this` or `parent`
    #[error("Unknown named operator `{name}` at {position}")]
    UnknownNamedOperator {
        /// The operator name
        name: String,
        /// Position of the operator
        position: Position,
    },

    /// A character that starts no token
    #[error("Unexpected character '{character}' at {position}")]
    UnexpectedCharacter {
        /// The character found
        character: char,
        /// Position of the character
        position: Position,
    },

    /// Quoted field name without its closing quote
    #[error("Unclosed string literal starting at {position}")]
    UnclosedString {
        /// Position of the opening quote
        position: Position,
    },

    /// Backtick named operator without its closing backtick
    #[error("Unclosed named operator starting at {position}")]
    UnclosedNamedOperator {
        /// Position of the opening backtick
        position: Position,
    },

    /// Invalid escape sequence in a quoted field name
    #[error("Invalid escape sequence {sequence} at {position}")]
    InvalidEscape {
        /// The invalid escape sequence
        sequence: String,
        /// Position of the backslash
        position: Position,
    },

    /// Integer literal outside the 64-bit range
    #[error("Invalid number literal {value} at {position}")]
    InvalidNumber {
        /// The literal text
        value: String,
        /// Position of the literal
        position: Position,
    },

    /// Nesting deeper than the configured limit
    #[error("Expression nesting exceeds the limit of {limit} at {position}")]
    NestingTooDeep {
        /// Configured maximum depth
        limit: usize,
        /// Position where the limit was crossed
        position: Position,
    },
}

impl ParseError {
    /// Position the error points at
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEndOfInput { position }
            | ParseError::UnknownNamedOperator { position, .. }
            | ParseError::UnexpectedCharacter { position, .. }
            | ParseError::UnclosedString { position }
            | ParseError::UnclosedNamedOperator { position }
            | ParseError::InvalidEscape { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::NestingTooDeep { position, .. } => *position,
        }
    }

    /// Check if the error was raised by the grammar rather than the tokenizer
    pub fn is_grammar_error(&self) -> bool {
        matches!(
            self,
            ParseError::UnexpectedToken { .. }
                | ParseError::UnexpectedEndOfInput { .. }
                | ParseError::UnknownNamedOperator { .. }
                | ParseError::NestingTooDeep { .. }
        )
    }

    /// Position just past the source text the error covers
    fn end(&self) -> Position {
        let width = match self {
            ParseError::UnexpectedToken { end, .. } => return *end,
            ParseError::UnknownNamedOperator { name, .. } => name.chars().count() + 2,
            ParseError::InvalidEscape { sequence, .. } => sequence.chars().count(),
            ParseError::InvalidNumber { value, .. } => value.chars().count(),
            _ => 1,
        };
        let start = self.position();
        Position::new(
            start.line,
            start.column + width as u32,
            start.offset + width,
        )
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            ParseError::UnexpectedToken { .. } => DiagnosticCode::UnexpectedToken,
            ParseError::UnexpectedEndOfInput { .. } => DiagnosticCode::UnexpectedEndOfInput,
            ParseError::UnknownNamedOperator { .. } => DiagnosticCode::UnknownNamedOperator,
            ParseError::UnexpectedCharacter { .. } => DiagnosticCode::UnexpectedCharacter,
            ParseError::UnclosedString { .. } => DiagnosticCode::UnclosedString,
            ParseError::UnclosedNamedOperator { .. } => DiagnosticCode::UnclosedNamedOperator,
            ParseError::InvalidEscape { .. } => DiagnosticCode::InvalidEscape,
            ParseError::InvalidNumber { .. } => DiagnosticCode::InvalidNumber,
            ParseError::NestingTooDeep { .. } => DiagnosticCode::NestingTooDeep,
        };

        DiagnosticBuilder::error(code)
            .with_message(self.to_string())
            .with_span(self.position(), self.end())
            .build()
    }

    /// Convert to a diagnostic that carries the source text for rendering
    pub fn to_diagnostic_with_source(&self, source: &str) -> Diagnostic {
        let mut diagnostic = self.to_diagnostic();
        diagnostic.location.source_text = Some(source.to_string());
        diagnostic
    }
}
