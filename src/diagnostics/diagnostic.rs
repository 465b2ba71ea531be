// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core diagnostic types

use crate::parser::span::Position;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Hint - subtle suggestion for improvement
    Hint,
    /// Information - provides helpful information
    #[default]
    Info,
    /// Warning - may indicate a problem but doesn't prevent compilation
    Warning,
    /// Error - prevents successful compilation
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Diagnostic error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticCode {
    /// Unexpected token in expression
    UnexpectedToken,
    /// Input ended inside an expression
    UnexpectedEndOfInput,
    /// Named operator other than `this`/`parent`
    UnknownNamedOperator,
    /// Character that starts no token
    UnexpectedCharacter,
    /// Unclosed quoted field name
    UnclosedString,
    /// Unclosed backtick named operator
    UnclosedNamedOperator,
    /// Invalid escape sequence
    InvalidEscape,
    /// Invalid number format
    InvalidNumber,
    /// Nesting limit exceeded
    NestingTooDeep,
}

impl DiagnosticCode {
    /// Stable short code, e.g. `JP0001`
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedToken => "JP0001",
            DiagnosticCode::UnexpectedEndOfInput => "JP0002",
            DiagnosticCode::UnknownNamedOperator => "JP0003",
            DiagnosticCode::UnexpectedCharacter => "JP0101",
            DiagnosticCode::UnclosedString => "JP0102",
            DiagnosticCode::UnclosedNamedOperator => "JP0103",
            DiagnosticCode::InvalidEscape => "JP0104",
            DiagnosticCode::InvalidNumber => "JP0105",
            DiagnosticCode::NestingTooDeep => "JP0201",
        }
    }
}

/// Location of a diagnostic in the source text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    /// First character covered
    pub start: Position,
    /// Position just past the last character covered
    pub end: Position,
    /// The complete source text, when known
    pub source_text: Option<String>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: SourceLocation,
    /// Simple contextual help message
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        code: DiagnosticCode,
        severity: Severity,
        message: String,
        location: SourceLocation,
    ) -> Self {
        let help = Self::generate_help(code);
        Self {
            severity,
            code,
            message,
            location,
            help,
        }
    }

    /// Generate simple contextual help based on diagnostic code
    fn generate_help(code: DiagnosticCode) -> Option<String> {
        let help = match code {
            DiagnosticCode::UnexpectedToken => {
                "Check the expression for a missing operand or a misplaced operator"
            }
            DiagnosticCode::UnexpectedEndOfInput => {
                "The expression is incomplete; an operator or bracket is missing its right side"
            }
            DiagnosticCode::UnknownNamedOperator => "Only `this` and `parent` are named operators",
            DiagnosticCode::UnclosedString => "Close the quoted field name with a matching quote",
            DiagnosticCode::UnclosedNamedOperator => "Close the named operator with a backtick",
            DiagnosticCode::NestingTooDeep => {
                "Flatten the expression or raise the configured nesting limit"
            }
            _ => return None,
        };
        Some(help.to_string())
    }

    /// Error code as a string
    pub fn code_string(&self) -> &'static str {
        self.code.as_str()
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = SourceLocation {
            start: Position::new(6, 11, 40),
            end: Position::new(6, 14, 43),
            source_text: None,
        };
        assert_eq!(location.to_string(), "6:11-14");

        let spanning = SourceLocation {
            start: Position::new(1, 4, 3),
            end: Position::new(2, 2, 6),
            source_text: None,
        };
        assert_eq!(spanning.to_string(), "1:4-2:2");
    }

    #[test]
    fn test_help_generated_from_code() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::UnknownNamedOperator,
            Severity::Error,
            "Unknown named operator `foo`".to_string(),
            SourceLocation::default(),
        );
        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code_string(), "JP0003");
        assert!(diagnostic.help.as_deref().unwrap().contains("`this`"));
        assert_eq!(diagnostic.to_string(), "error: Unknown named operator `foo`");
    }
}
