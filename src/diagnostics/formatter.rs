//! Formatting diagnostics for different output formats

use super::diagnostic::Diagnostic;
#[cfg(feature = "terminal")]
use super::diagnostic::Severity;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Compact single-line format
    Compact,
}

/// Formatter for diagnostics
pub struct DiagnosticFormatter {
    format: Format,
    show_code: bool,
    show_help: bool,
    #[cfg(feature = "terminal")]
    use_color: bool,
}

impl DiagnosticFormatter {
    /// Create a new formatter
    pub fn new(format: Format) -> Self {
        Self {
            format,
            show_code: true,
            show_help: true,
            #[cfg(feature = "terminal")]
            use_color: true,
        }
    }

    /// Set whether to show error codes
    pub fn with_code(mut self, show: bool) -> Self {
        self.show_code = show;
        self
    }

    /// Set whether to show help text
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    /// Set whether to use color (terminal feature only)
    #[cfg(feature = "terminal")]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Format a diagnostic
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match self.format {
            Format::Text => self.format_text(diagnostic),
            Format::Json => self.format_json(diagnostic),
            Format::Compact => self.format_compact(diagnostic),
        }
    }

    fn format_text(&self, diagnostic: &Diagnostic) -> String {
        let mut result = String::new();

        result.push_str(&self.header(diagnostic));
        if self.show_code {
            result.push_str(&format!(" [{}]", diagnostic.code_string()));
        }
        result.push('\n');

        let location = &diagnostic.location;
        result.push_str(&format!(" --> {location}\n"));

        if let Some(source) = &location.source_text {
            let line_idx = location.start.line.saturating_sub(1) as usize;
            // Input ending in a newline reports its end position on an empty last line
            let line = source.lines().nth(line_idx).unwrap_or("");
            result.push_str(&format!("{:4} | {}\n", line_idx + 1, line));

            let line_width = line.chars().count() as u32 + 1;
            let start_col = location.start.column.max(1);
            let end_col = if location.end.line == location.start.line {
                location.end.column.min(line_width.max(start_col + 1))
            } else {
                line_width
            };
            let width = end_col.saturating_sub(start_col).max(1) as usize;

            result.push_str("     | ");
            result.push_str(&" ".repeat(start_col as usize - 1));
            result.push_str(&self.underline(diagnostic, width));
            result.push('\n');
        }

        if self.show_help {
            if let Some(help) = &diagnostic.help {
                result.push_str(&format!("help: {help}\n"));
            }
        }

        result
    }

    #[cfg(feature = "terminal")]
    fn header(&self, diagnostic: &Diagnostic) -> String {
        if !self.use_color {
            return format!("{}: {}", diagnostic.severity, diagnostic.message);
        }
        use colored::Colorize;
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
            Severity::Hint => "hint".green().bold(),
        };
        format!("{}: {}", severity_str, diagnostic.message.bold())
    }

    #[cfg(not(feature = "terminal"))]
    fn header(&self, diagnostic: &Diagnostic) -> String {
        format!("{}: {}", diagnostic.severity, diagnostic.message)
    }

    #[cfg(feature = "terminal")]
    fn underline(&self, diagnostic: &Diagnostic, width: usize) -> String {
        let underline = "^".repeat(width);
        if !self.use_color {
            return underline;
        }
        use colored::Colorize;
        match diagnostic.severity {
            Severity::Error => underline.red().to_string(),
            Severity::Warning => underline.yellow().to_string(),
            Severity::Info => underline.blue().to_string(),
            Severity::Hint => underline.green().to_string(),
        }
    }

    #[cfg(not(feature = "terminal"))]
    fn underline(&self, _diagnostic: &Diagnostic, width: usize) -> String {
        "^".repeat(width)
    }

    fn format_json(&self, diagnostic: &Diagnostic) -> String {
        #[cfg(feature = "serde")]
        {
            serde_json::to_string_pretty(diagnostic)
                .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
        }

        #[cfg(not(feature = "serde"))]
        {
            format!("{diagnostic:?}")
        }
    }

    fn format_compact(&self, diagnostic: &Diagnostic) -> String {
        let code = if self.show_code {
            format!("[{}] ", diagnostic.code_string())
        } else {
            String::new()
        };

        format!(
            "{}: {}: {}{}",
            diagnostic.location, diagnostic.severity, code, diagnostic.message
        )
    }
}

impl Default for DiagnosticFormatter {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

/// Extension trait for formatting diagnostics
pub trait DiagnosticFormat {
    /// Format as human-readable text
    fn to_text(&self) -> String;

    /// Format as JSON
    fn to_json(&self) -> String;

    /// Format as compact single line
    fn to_compact(&self) -> String;
}

impl DiagnosticFormat for Diagnostic {
    fn to_text(&self) -> String {
        let formatter = DiagnosticFormatter::new(Format::Text);
        #[cfg(feature = "terminal")]
        let formatter = formatter.with_color(false);
        formatter.format(self)
    }

    fn to_json(&self) -> String {
        DiagnosticFormatter::new(Format::Json).format(self)
    }

    fn to_compact(&self) -> String {
        DiagnosticFormatter::new(Format::Compact).format(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::builder::DiagnosticBuilder;
    use crate::diagnostics::diagnostic::DiagnosticCode;
    use crate::parser::span::Position;

    fn plain(format: Format) -> DiagnosticFormatter {
        let formatter = DiagnosticFormatter::new(format);
        #[cfg(feature = "terminal")]
        let formatter = formatter.with_color(false);
        formatter
    }

    #[test]
    fn test_text_format() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::UnexpectedToken)
            .with_message("Parse error at 1:5 near token ] (']')")
            .with_span(Position::new(1, 5, 4), Position::new(1, 6, 5))
            .with_source_text("$.a[]")
            .build();

        let output = plain(Format::Text).with_code(false).format(&diagnostic);

        assert!(output.contains("error: Parse error at 1:5"));
        assert!(output.contains("   1 | $.a[]"));
        assert!(output.contains("     |     ^\n"));
        assert!(output.contains("help: "));
    }

    #[test]
    fn test_text_format_at_end_of_input() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::UnexpectedEndOfInput)
            .with_span(Position::new(1, 3, 2), Position::new(1, 4, 3))
            .with_source_text("$.")
            .build();

        let output = plain(Format::Text).with_help(false).format(&diagnostic);
        assert!(output.contains("[JP0002]"));
        assert!(output.contains("     |   ^\n"));
        assert!(!output.contains("help:"));
    }

    #[test]
    fn test_compact_format() {
        let diagnostic = DiagnosticBuilder::error(DiagnosticCode::UnknownNamedOperator)
            .with_message("Unknown named operator `foo`")
            .with_span(Position::new(6, 11, 50), Position::new(6, 14, 53))
            .build();

        let output = diagnostic.to_compact();

        assert_eq!(
            output,
            "6:11-14: error: [JP0003] Unknown named operator `foo`"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_format() {
        let diagnostic = DiagnosticBuilder::warning(DiagnosticCode::InvalidNumber)
            .with_message("Invalid number")
            .build();
        let json: serde_json::Value = serde_json::from_str(&diagnostic.to_json()).unwrap();
        assert_eq!(json["severity"], "Warning");
        assert_eq!(json["code"], "InvalidNumber");
    }
}
