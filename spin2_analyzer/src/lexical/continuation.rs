//! Logical lines assembled from one or more physical lines
//!
//! Each physical piece starts at column 0 of its line, so an offset inside a
//! piece is also its physical column. Pieces are joined with a single space.

use crate::config::compile_time::lexical::MAX_CONTINUATION_LINES;
use crate::utils::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    line: usize,
    logical_start: usize,
    len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuedLines {
    pieces: Vec<Piece>,
    text: String,
    complete: bool,
}

impl ContinuedLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complete logical line made of a single physical line
    pub fn single(line: usize, text: &str) -> Self {
        let mut lines = Self::new();
        lines.add(line, text);
        lines.mark_complete();
        lines
    }

    /// Append one physical line; rejected once the set is complete.
    /// Reaching the continuation cap completes the set.
    pub fn add(&mut self, line: usize, text: &str) -> bool {
        if self.complete {
            return false;
        }
        if !self.pieces.is_empty() {
            self.text.push(' ');
        }
        self.pieces.push(Piece {
            line,
            logical_start: self.text.len(),
            len: text.len(),
        });
        self.text.push_str(text);
        if self.pieces.len() >= MAX_CONTINUATION_LINES {
            self.complete = true;
        }
        true
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
        self.text.clear();
        self.complete = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn first_line(&self) -> usize {
        self.pieces.first().map(|p| p.line).unwrap_or(0)
    }

    pub fn last_line(&self) -> usize {
        self.pieces.last().map(|p| p.line).unwrap_or(0)
    }

    pub fn line_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.pieces.iter().map(|p| p.line)
    }

    /// Physical position of a byte offset in the logical text.
    /// The joining space maps to the end of the preceding piece.
    pub fn position_of(&self, offset: usize) -> Position {
        match self.pieces.iter().rev().find(|p| p.logical_start <= offset) {
            Some(p) => Position::new(p.line, (offset - p.logical_start).min(p.len)),
            None => Position::new(0, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_positions() {
        let lines = ContinuedLines::single(7, "PUB main()");
        assert!(lines.is_complete());
        assert_eq!(lines.position_of(4), Position::new(7, 4));
        assert_eq!(lines.first_line(), 7);
    }

    #[test]
    fn test_joined_lines_map_back_to_physical_columns() {
        let mut lines = ContinuedLines::new();
        assert!(lines.add(3, "PUB start(a,"));
        assert!(lines.add(4, "          b) : r"));
        lines.mark_complete();

        assert_eq!(lines.text(), "PUB start(a,           b) : r");
        let b_offset = lines.text().find('b').unwrap();
        assert_eq!(lines.position_of(b_offset), Position::new(4, 10));
        assert_eq!(lines.position_of(10), Position::new(3, 10));
        assert_eq!(lines.last_line(), 4);
    }

    #[test]
    fn test_complete_set_rejects_more_lines() {
        let mut lines = ContinuedLines::single(0, "x");
        assert!(!lines.add(1, "y"));
        lines.clear();
        assert!(lines.is_empty());
        assert!(lines.add(1, "y"));
    }

    #[test]
    fn test_cap_forces_completion() {
        let mut lines = ContinuedLines::new();
        for line in 0..MAX_CONTINUATION_LINES {
            lines.add(line, "a,");
        }
        assert!(lines.is_complete());
    }
}
