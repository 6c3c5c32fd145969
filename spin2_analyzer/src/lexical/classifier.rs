//! Comment scanning for one physical line
//!
//! Separates code from comments while tracking block-comment nesting across
//! lines. The code text keeps the line's byte offsets: every comment byte is
//! replaced by a space.

use super::text::push_blank;
use crate::findings::CommentKind;

/// Block-comment nesting carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    None,
    /// Inside `{ ... }`, with the net nesting depth
    Block(usize),
    /// Inside `{{ ... }}`
    Doc,
}

impl CommentState {
    pub fn is_open(&self) -> bool {
        !matches!(self, CommentState::None)
    }
}

/// Byte range of a comment on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub start: usize,
    pub end: usize,
    pub kind: CommentKind,
}

impl CommentRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn is_documentation(&self) -> bool {
        matches!(self.kind, CommentKind::Doc | CommentKind::DocLine)
    }

    pub fn is_line_comment(&self) -> bool {
        matches!(self.kind, CommentKind::Line | CommentKind::DocLine)
    }
}

/// Result of scanning one physical line
#[derive(Debug, Clone)]
pub struct ClassifiedLine {
    /// Code with comments blanked, same byte length as the input
    pub code: String,
    pub comments: Vec<CommentRange>,
    /// Comment state at the start of the line
    pub entry_state: CommentState,
}

impl ClassifiedLine {
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }

    /// Trailing `'` comment, the candidate right-edge declaration comment
    pub fn trailing_line_comment(&self) -> Option<&CommentRange> {
        self.comments.last().filter(|range| range.is_line_comment())
    }
}

/// Scan `line`, updating `state` to the comment state at end of line
pub fn classify_line(line: &str, state: &mut CommentState) -> ClassifiedLine {
    let entry_state = *state;
    let bytes = line.as_bytes();
    let mut code = String::with_capacity(line.len());
    let mut comments = Vec::new();

    let mut index = 0;
    let mut comment_start = 0;
    let mut in_string = false;
    let mut paren_depth: i32 = 0;
    // After a backtick inside parens, 'text' is a debug string, not a comment
    let mut tick_mode = false;
    let mut in_tick_string = false;

    while index < bytes.len() {
        let ch = bytes[index];
        match *state {
            CommentState::Doc => {
                if ch == b'}' && bytes.get(index + 1) == Some(&b'}') {
                    index += 2;
                    comments.push(CommentRange {
                        start: comment_start,
                        end: index,
                        kind: CommentKind::Doc,
                    });
                    blank_bytes(&mut code, &line[comment_start..index]);
                    *state = CommentState::None;
                } else {
                    index += 1;
                }
                continue;
            }
            CommentState::Block(depth) => {
                if ch == b'{' {
                    *state = CommentState::Block(depth + 1);
                } else if ch == b'}' {
                    if depth <= 1 {
                        comments.push(CommentRange {
                            start: comment_start,
                            end: index + 1,
                            kind: CommentKind::Block,
                        });
                        blank_bytes(&mut code, &line[comment_start..index + 1]);
                        *state = CommentState::None;
                    } else {
                        *state = CommentState::Block(depth - 1);
                    }
                }
                index += 1;
                continue;
            }
            CommentState::None => {}
        }

        if in_string {
            if ch == b'"' {
                in_string = false;
            }
            push_code_char(&mut code, line, &mut index);
            continue;
        }
        if in_tick_string {
            if ch == b'\'' {
                in_tick_string = false;
            }
            push_code_char(&mut code, line, &mut index);
            continue;
        }

        match ch {
            b'"' => {
                in_string = true;
                push_code_char(&mut code, line, &mut index);
            }
            b'(' => {
                paren_depth += 1;
                push_code_char(&mut code, line, &mut index);
            }
            b')' => {
                paren_depth -= 1;
                if paren_depth <= 0 {
                    tick_mode = false;
                }
                push_code_char(&mut code, line, &mut index);
            }
            b'`' => {
                if paren_depth > 0 {
                    tick_mode = true;
                }
                push_code_char(&mut code, line, &mut index);
            }
            b'\'' if tick_mode => {
                in_tick_string = true;
                push_code_char(&mut code, line, &mut index);
            }
            b'\'' => {
                let kind = if bytes.get(index + 1) == Some(&b'\'') {
                    CommentKind::DocLine
                } else {
                    CommentKind::Line
                };
                comments.push(CommentRange {
                    start: index,
                    end: line.len(),
                    kind,
                });
                blank_bytes(&mut code, &line[index..]);
                index = line.len();
            }
            b'{' => {
                comment_start = index;
                if bytes.get(index + 1) == Some(&b'{') {
                    *state = CommentState::Doc;
                    index += 2;
                } else {
                    *state = CommentState::Block(1);
                    index += 1;
                }
            }
            _ => push_code_char(&mut code, line, &mut index),
        }
    }

    // Comment still open at end of line
    if state.is_open() && comment_start < line.len() {
        let start = comment_start;
        let kind = match state {
            CommentState::Doc => CommentKind::Doc,
            _ => CommentKind::Block,
        };
        comments.push(CommentRange {
            start,
            end: line.len(),
            kind,
        });
        blank_bytes(&mut code, &line[start..]);
    }

    ClassifiedLine {
        code,
        comments,
        entry_state,
    }
}

fn push_code_char(code: &mut String, line: &str, index: &mut usize) {
    let ch = line[*index..].chars().next().unwrap_or(' ');
    code.push(ch);
    *index += ch.len_utf8();
}

fn blank_bytes(code: &mut String, text: &str) {
    for ch in text.chars() {
        push_blank(code, ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(line: &str) -> (ClassifiedLine, CommentState) {
        let mut state = CommentState::None;
        let result = classify_line(line, &mut state);
        (result, state)
    }

    #[test]
    fn test_trailing_line_comment() {
        let (line, state) = scan("  x := 1   ' set x");
        assert_eq!(line.code.trim_end(), "  x := 1");
        assert_eq!(line.code.len(), "  x := 1   ' set x".len());
        assert_eq!(line.comments.len(), 1);
        assert_eq!(line.comments[0].kind, CommentKind::Line);
        assert_eq!(line.comments[0].start, 11);
        assert_eq!(state, CommentState::None);
    }

    #[test]
    fn test_doc_line_comment() {
        let (line, _) = scan("'' docs");
        assert_eq!(line.comments[0].kind, CommentKind::DocLine);
        assert!(!line.has_code());
    }

    #[test]
    fn test_quote_inside_string_is_not_comment() {
        let (line, _) = scan(r#"s := string("it's")"#);
        assert!(line.comments.is_empty());
        assert!(line.code.contains("it's"));
    }

    #[test]
    fn test_debug_tick_string_is_not_comment() {
        let (line, _) = scan("debug(`term t title 'hello') ' real comment");
        assert_eq!(line.comments.len(), 1);
        assert!(line.code.contains("'hello'"));
        assert_eq!(line.comments[0].start, 29);
    }

    #[test]
    fn test_nested_block_comment_on_one_line() {
        let text = "{ outer { inner } still-open }";
        let (line, state) = scan(text);
        assert_eq!(state, CommentState::None);
        assert_eq!(line.comments.len(), 1);
        assert_eq!(line.comments[0].end, text.len());
        assert!(!line.has_code());
    }

    #[test]
    fn test_inline_block_comment_between_code() {
        let (line, _) = scan("a {note} := 5");
        assert_eq!(line.code, "a        := 5");
        assert_eq!(line.comments[0].kind, CommentKind::Block);
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let mut state = CommentState::None;
        let first = classify_line("x := 1 { start", &mut state);
        assert_eq!(state, CommentState::Block(1));
        assert_eq!(first.code.trim_end(), "x := 1");

        let middle = classify_line("  still { nested }", &mut state);
        assert_eq!(state, CommentState::Block(1));
        assert!(!middle.has_code());
        assert_eq!(middle.comments[0].start, 0);

        let last = classify_line("} y := 2", &mut state);
        assert_eq!(state, CommentState::None);
        assert_eq!(last.code.trim(), "y := 2");
        assert_eq!(last.entry_state, CommentState::Block(1));
    }

    #[test]
    fn test_doc_block_comment() {
        let mut state = CommentState::None;
        classify_line("{{", &mut state);
        assert_eq!(state, CommentState::Doc);
        let inner = classify_line("  { not nesting", &mut state);
        assert_eq!(state, CommentState::Doc);
        assert_eq!(inner.comments[0].kind, CommentKind::Doc);
        classify_line("}}", &mut state);
        assert_eq!(state, CommentState::None);
    }
}
