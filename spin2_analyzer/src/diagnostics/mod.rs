//! Diagnostic collection for both analysis passes
//!
//! Language-level problems never abort analysis; they are recorded here and
//! returned with the token stream.

use crate::logging::Code;
use crate::utils::{Position, Span};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
            DiagnosticSeverity::Information => "information",
            DiagnosticSeverity::Hint => "hint",
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: DiagnosticSeverity,
    pub code: Code,
    pub message: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    pub fn line(&self) -> usize {
        self.span.start.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} [{}]",
            self.span.start, self.severity, self.message, self.code
        )
    }
}

/// Accumulates diagnostics from both passes
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    entries: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a single-line diagnostic; an inverted column range is ignored
    pub fn push(
        &mut self,
        line: usize,
        start_column: usize,
        end_column: usize,
        severity: DiagnosticSeverity,
        code: Code,
        message: impl Into<String>,
    ) {
        if end_column < start_column {
            return;
        }
        self.push_span(Span::single_line(line, start_column, end_column), severity, code, message);
    }

    pub fn push_span(
        &mut self,
        span: Span,
        severity: DiagnosticSeverity,
        code: Code,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            span,
            severity,
            code,
            message: message.into(),
        });
    }

    /// Error covering `length` columns from `start_column`
    pub fn error(
        &mut self,
        line: usize,
        start_column: usize,
        length: usize,
        code: Code,
        message: impl Into<String>,
    ) {
        self.push(
            line,
            start_column,
            start_column + length,
            DiagnosticSeverity::Error,
            code,
            message,
        );
    }

    pub fn information(
        &mut self,
        line: usize,
        start_column: usize,
        length: usize,
        code: Code,
        message: impl Into<String>,
    ) {
        self.push(
            line,
            start_column,
            start_column + length,
            DiagnosticSeverity::Information,
            code,
            message,
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    /// Sorted, de-duplicated and capped at `max` entries
    pub fn finish(self, max: usize) -> Vec<Diagnostic> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| {
            (a.span.start, a.span.end).cmp(&(b.span.start, b.span.end))
        });

        let mut seen: HashSet<(Position, String)> = HashSet::new();
        entries.retain(|d| seen.insert((d.span.start, d.message.clone())));
        entries.truncate(max);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_finish_sorts_and_deduplicates() {
        let mut collector = DiagnosticCollector::new();
        collector.error(4, 2, 3, codes::references::MISSING_DECLARATION, "Missing Declaration [b]");
        collector.error(1, 0, 3, codes::references::MISSING_DECLARATION, "Missing Declaration [a]");
        collector.error(4, 2, 3, codes::references::MISSING_DECLARATION, "Missing Declaration [b]");

        let diagnostics = collector.finish(100);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line(), 1);
        assert_eq!(diagnostics[1].message, "Missing Declaration [b]");
    }

    #[test]
    fn test_finish_caps_count() {
        let mut collector = DiagnosticCollector::new();
        for line in 0..10 {
            collector.error(line, 0, 1, codes::references::MISSING_DECLARATION, "x");
        }
        assert_eq!(collector.finish(3).len(), 3);
    }

    #[test]
    fn test_inverted_range_ignored() {
        let mut collector = DiagnosticCollector::new();
        collector.push(
            0,
            5,
            2,
            DiagnosticSeverity::Error,
            codes::references::MISSING_DECLARATION,
            "bad",
        );
        assert!(collector.is_empty());
    }

    #[test]
    fn test_information_is_not_error() {
        let mut collector = DiagnosticCollector::new();
        collector.information(0, 0, 1, codes::declarations::HIDES_GLOBAL, "hidden");
        assert_eq!(collector.error_count(), 0);
        assert_eq!(collector.len(), 1);
    }
}
