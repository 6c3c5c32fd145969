//! Small text helpers shared by both passes
//!
//! All helpers preserve byte offsets: anything they hide is overwritten with
//! ASCII spaces so offsets in the result still index the original line.

/// One whitespace-delimited word and its byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Word<'a> {
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.text.eq_ignore_ascii_case(other)
    }
}

/// Offset of the first non-whitespace byte at or after `from`
pub fn skip_whitespace(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut index = from;
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    index
}

/// Replace the contents of every double-quoted string, quotes included, with spaces.
/// An unterminated string runs to end of line.
pub fn blank_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    for ch in text.chars() {
        if ch == '"' {
            in_string = !in_string;
            push_blank(&mut out, ch);
        } else if in_string {
            push_blank(&mut out, ch);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Push one space per byte of `ch` so byte offsets are kept
pub(crate) fn push_blank(out: &mut String, ch: char) {
    for _ in 0..ch.len_utf8() {
        out.push(' ');
    }
}

/// Whitespace-delimited words with their offsets
pub fn words(text: &str) -> Vec<Word<'_>> {
    let mut result = Vec::new();
    let mut start: Option<usize> = None;
    for (offset, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(begin) = start.take() {
                result.push(Word {
                    text: &text[begin..offset],
                    offset: begin,
                });
            }
        } else if start.is_none() {
            start = Some(offset);
        }
    }
    if let Some(begin) = start {
        result.push(Word {
            text: &text[begin..],
            offset: begin,
        });
    }
    result
}

pub fn first_word(text: &str) -> Option<Word<'_>> {
    let start = skip_whitespace(text, 0);
    if start >= text.len() {
        return None;
    }
    let end = text[start..]
        .find(|c: char| c.is_whitespace())
        .map(|len| start + len)
        .unwrap_or(text.len());
    Some(Word {
        text: &text[start..end],
        offset: start,
    })
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Case-insensitive search for `word` at an identifier boundary, starting at `from`
pub fn index_of_word(text: &str, word: &str, from: usize) -> Option<usize> {
    if word.is_empty() || from > text.len() {
        return None;
    }
    let haystack = text.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();
    let mut search_from = from;
    while let Some(found) = haystack[search_from..].find(&needle) {
        let start = search_from + found;
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if before_ok && after_ok {
            return Some(start);
        }
        search_from = start + needle.len().max(1);
        if search_from > haystack.len() {
            break;
        }
    }
    None
}

/// Whether `word` occurs as a whole word outside double-quoted strings
pub fn contains_word(text: &str, word: &str) -> bool {
    index_of_word(&blank_strings(text), word, 0).is_some()
}

/// Split `text` on top-level commas (outside parens, brackets and strings),
/// returning each piece with its starting offset
pub fn split_top_level_commas(text: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut start = 0;
    for (offset, ch) in text.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth -= 1,
            ',' if !in_string && depth <= 0 => {
                pieces.push((start, &text[start..offset]));
                start = offset + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &text[start..]));
    pieces
}

/// Net count of opening minus closing parens and brackets outside strings
pub fn open_bracket_balance(text: &str) -> i32 {
    blank_strings(text).chars().fold(0, |balance, ch| match ch {
        '(' | '[' => balance + 1,
        ')' | ']' => balance - 1,
        _ => balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_strings_keeps_offsets() {
        let text = r#"x := string("a'b") + 1"#;
        let blanked = blank_strings(text);
        assert_eq!(blanked.len(), text.len());
        assert!(!blanked.contains('\''));
        assert!(blanked.ends_with("+ 1"));
    }

    #[test]
    fn test_words_and_first_word() {
        let found = words("  PUB  main()  ");
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].text, "main()");
        assert_eq!(found[1].offset, 7);
        assert_eq!(first_word("\tcon x").map(|w| w.offset), Some(1));
        assert!(first_word("   ").is_none());
    }

    #[test]
    fn test_index_of_word_respects_boundaries() {
        assert_eq!(index_of_word("reorg org 0", "org", 0), Some(6));
        assert_eq!(index_of_word("ORG", "org", 0), Some(0));
        assert_eq!(index_of_word("orgh", "org", 0), None);
        assert!(!contains_word(r#"byte "org", 0"#, "org"));
    }

    #[test]
    fn test_split_top_level_commas() {
        let pieces = split_top_level_commas(r#"a = f(1, 2), b[3], s = "x,y""#);
        let texts: Vec<&str> = pieces.iter().map(|(_, t)| t.trim()).collect();
        assert_eq!(texts, vec!["a = f(1, 2)", "b[3]", r#"s = "x,y""#]);
        assert_eq!(pieces[1].0, 12);
    }

    #[test]
    fn test_bracket_balance_ignores_strings() {
        assert_eq!(open_bracket_balance("PUB start(a, b"), 1);
        assert_eq!(open_bracket_balance(r#"x : "a(b.spin2""#), 0);
        assert_eq!(open_bracket_balance("f(a[1]))"), -1);
    }
}
