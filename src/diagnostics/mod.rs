//! Diagnostics for path expression compile errors
//!
//! A [`ParseError`](crate::parser::ParseError) converts into a [`Diagnostic`]
//! that carries a stable code, the covered source range and contextual help.
//! [`DiagnosticFormatter`] renders it as text, compact single lines or JSON.

pub mod builder;
pub mod diagnostic;
pub mod formatter;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, SourceLocation};
pub use formatter::{DiagnosticFormat, DiagnosticFormatter, Format};
