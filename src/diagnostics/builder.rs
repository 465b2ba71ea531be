//! Fluent construction of diagnostics

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity, SourceLocation};
use crate::parser::span::Position;

/// Builder for [`Diagnostic`]
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    code: DiagnosticCode,
    severity: Severity,
    message: Option<String>,
    location: SourceLocation,
}

impl DiagnosticBuilder {
    /// Start an error diagnostic
    pub fn error(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Error)
    }

    /// Start a warning diagnostic
    pub fn warning(code: DiagnosticCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    fn new(code: DiagnosticCode, severity: Severity) -> Self {
        Self {
            code,
            severity,
            message: None,
            location: SourceLocation::default(),
        }
    }

    /// Set the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the covered range
    pub fn with_span(mut self, start: Position, end: Position) -> Self {
        self.location.start = start;
        self.location.end = end;
        self
    }

    /// Attach the source text
    pub fn with_source_text(mut self, source: impl Into<String>) -> Self {
        self.location.source_text = Some(source.into());
        self
    }

    /// Build the diagnostic
    pub fn build(self) -> Diagnostic {
        let message = self
            .message
            .unwrap_or_else(|| format!("{:?}", self.code));
        Diagnostic::new(self.code, self.severity, message, self.location)
    }
}
