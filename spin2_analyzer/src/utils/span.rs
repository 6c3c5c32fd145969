//! Source location tracking for the Spin2 analyzer
//!
//! Positions are 0-based line/column pairs, the same coordinates used by the
//! emitted tokens. Internally the scanners work in byte columns; `SourceLines`
//! converts to character columns once analysis is complete.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text (0-based line and column)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Human-facing output is 1-based
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A span of source text from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "Span start must not be after end");
        Self { start, end }
    }

    /// Span covering `start_column..end_column` on a single line
    pub fn single_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column.max(start_column)),
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if a position lies within this span
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Merge two spans into one covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line + 1,
                self.start.column + 1,
                self.end.column + 1
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Physical lines of one document, split the way the editor counts them
#[derive(Debug, Clone)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    /// Split on `\n`, dropping a trailing `\r` from each line
    pub fn new(source: &str) -> Self {
        let lines = source
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.lines
    }

    /// Convert a byte column into a character column on the given line
    pub fn char_column(&self, line: usize, byte_column: usize) -> usize {
        match self.lines.get(line) {
            Some(text) if text.is_ascii() => byte_column,
            Some(text) => {
                let clamped = byte_column.min(text.len());
                text.char_indices()
                    .take_while(|(offset, _)| *offset < clamped)
                    .count()
            }
            None => byte_column,
        }
    }

    /// Character length of `byte_len` bytes starting at `byte_column`
    pub fn char_length(&self, line: usize, byte_column: usize, byte_len: usize) -> usize {
        self.char_column(line, byte_column + byte_len) - self.char_column(line, byte_column)
    }

    /// Format a message with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut result = String::new();

        result.push_str(&format!("{}\n", message));
        result.push_str(&format!("  --> {}\n", span.start));

        if let Some(line) = self.get(span.start.line) {
            let line_num_str = format!("{}", span.start.line + 1);
            let padding = " ".repeat(line_num_str.len());

            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", line_num_str, line));

            let span_len = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column)
            } else {
                line.chars().count().saturating_sub(span.start.column)
            };

            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(span.start.column),
                "^".repeat(span_len.max(1))
            ));
        }

        result
    }
}
