//! `debug(...)` calls: display declarations and feeds, string literals and
//! backtick interpolation

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::builtins::{is_debug_color, is_feed_parameter, is_setup_parameter, DebugDisplayType};
use crate::declarations::debug::{debug_arguments, display_declaration};
use crate::declarations::statements::{identifier_len, matching_close, starts_identifier, Piece};
use crate::lexical::text::blank_strings;
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::tokens::{TokenKind, TokenModifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayMode {
    Plain,
    Setup(DebugDisplayType),
    Feed(DebugDisplayType),
}

/// `` `( `` or `` `name( `` inside a string: offset of the `(`
fn interpolation_paren(code: &str, tick: usize) -> Option<usize> {
    let after = tick + 1;
    let paren = if starts_identifier(code, after) {
        after + identifier_len(code, after)
    } else {
        after
    };
    (code.as_bytes().get(paren) == Some(&b'(')).then_some(paren)
}

/// Byte ranges of literal text in `code[open..close]`, quotes included.
/// Double quotes always open a string; single quotes only after a backtick
/// has switched the call into display mode. Interpolations split a string
/// into several ranges.
fn string_literals(code: &str, open: usize, close: usize) -> Vec<(usize, usize)> {
    let bytes = code.as_bytes();
    let close = close.min(bytes.len());
    let mut spans = Vec::new();
    let mut tick_mode = false;
    let mut at = open;

    while at < close {
        let quote = bytes[at];
        if quote == b'`' {
            tick_mode = true;
            at += 1;
            continue;
        }
        if !(quote == b'"' || (quote == b'\'' && tick_mode)) {
            at += 1;
            continue;
        }

        let mut segment = at;
        at += 1;
        while at < close && bytes[at] != quote {
            if bytes[at] == b'`' {
                if let Some(end) = interpolation_paren(code, at).and_then(|p| matching_close(code, p)) {
                    if at > segment {
                        spans.push((segment, at));
                    }
                    at = end + 1;
                    segment = at;
                    continue;
                }
            }
            at += 1;
        }
        let end = (at + 1).min(close);
        if end > segment {
            spans.push((segment, end));
        }
        at = end;
    }
    spans
}

impl Resolver<'_, '_> {
    /// Resolve the `debug` at `at`; returns the offset just past its argument list
    pub(super) fn resolve_debug(&mut self, line: &LogicalLine, method: Option<&str>, at: usize) -> usize {
        let code = line.code();
        let keyword_end = at + "debug".len();
        self.emit(
            &line.text,
            Piece::new(at, &code[at..keyword_end]),
            TokenKind::Debug,
            &[TokenModifier::DefaultLibrary],
        );

        let blanked = blank_strings(code);
        let Some((open, close)) = debug_arguments(code, &blanked, at) else {
            return keyword_end;
        };

        let mut masked = code.to_string();
        for (start, end) in string_literals(code, open, close) {
            self.emit(&line.text, Piece::new(start, &code[start..end]), TokenKind::String, &[]);
            masked.replace_range(start..end, &" ".repeat(end - start));
        }

        let (params_from, mode) = self.resolve_display_head(line, open);
        self.resolve_display_parameters(line, &masked, params_from, close, mode);

        let expr = Expr {
            text: &line.text,
            code: &masked,
            method,
            scope: Scope::Debug,
        };
        self.resolve_range(&expr, params_from, close, false);
        (close + 1).min(code.len())
    }

    /// `` `type name `` or `` `name ``; returns where parameters start
    fn resolve_display_head(&mut self, line: &LogicalLine, open: usize) -> (usize, DisplayMode) {
        let code = line.code();
        let Some(declaration) = display_declaration(code, open) else {
            return (open, DisplayMode::Plain);
        };
        let type_word = declaration.type_word;

        if let Some(display_type) = declaration.display_type {
            self.emit(&line.text, type_word, TokenKind::DisplayType, &[]);
            let Some(name) = declaration.name else {
                return (type_word.end(), DisplayMode::Setup(display_type));
            };
            let declared_here = self
                .findings
                .display(name.text)
                .is_some_and(|d| d.line == line.text.position_of(name.offset).line);
            let modifiers: &[TokenModifier] = if declared_here {
                &[TokenModifier::Declaration, TokenModifier::Readonly]
            } else {
                &[TokenModifier::Readonly]
            };
            self.emit(&line.text, name, TokenKind::DisplayName, modifiers);
            return (name.end(), DisplayMode::Setup(display_type));
        }

        match self.findings.display(type_word.text) {
            Some(display) => {
                let display_type = display.display_type;
                self.emit(&line.text, type_word, TokenKind::DisplayName, &[TokenModifier::Readonly]);
                (type_word.end(), DisplayMode::Feed(display_type))
            }
            None => {
                self.emit(&line.text, type_word, TokenKind::DisplayType, &[TokenModifier::IllegalUse]);
                self.error(
                    &line.text,
                    type_word,
                    codes::references::UNKNOWN_DISPLAY_TYPE,
                    format!("Unknown debug display type [{}]", type_word.text),
                );
                (type_word.end(), DisplayMode::Plain)
            }
        }
    }

    /// Display keywords and colors get their own tokens ahead of the
    /// generic resolution
    fn resolve_display_parameters(
        &mut self,
        line: &LogicalLine,
        masked: &str,
        from: usize,
        to: usize,
        mode: DisplayMode,
    ) {
        if mode == DisplayMode::Plain {
            return;
        }
        let bytes = masked.as_bytes();
        let to = to.min(bytes.len());
        let mut at = from;
        while at < to {
            let preceded = at > 0 && (bytes[at - 1].is_ascii_alphanumeric() || matches!(bytes[at - 1], b'_' | b'.'));
            if preceded || !starts_identifier(masked, at) {
                at += 1;
                continue;
            }
            let word = Piece::new(at, &masked[at..at + identifier_len(masked, at)]);
            at = word.end();
            let kind = match mode {
                DisplayMode::Setup(display) if is_setup_parameter(display, word.text) => TokenKind::SetupParameter,
                DisplayMode::Feed(display) if is_feed_parameter(display, word.text, self.version) => {
                    TokenKind::FeedParameter
                }
                _ if is_debug_color(word.text) => TokenKind::ColorName,
                _ => continue,
            };
            self.emit(&line.text, word, kind, &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_resolution::tests::resolve_source;

    #[test]
    fn test_string_literals_split_on_interpolation() {
        let code = "debug(`term t 'x = `(x) done')";
        let spans = string_literals(code, 6, code.len() - 1);
        let texts: Vec<&str> = spans.iter().map(|(s, e)| &code[*s..*e]).collect();
        assert_eq!(texts, vec!["'x = ", " done'"]);

        let code = "debug(\"it's\", udec(v))";
        let spans = string_literals(code, 6, code.len() - 1);
        assert_eq!(spans, vec![(6, 12)]);
    }

    #[test]
    fn test_display_setup_and_feed() {
        let source = "PUB main() | v\n  debug(`term out title 'Log' pos 10 10 color red)\n  debug(`out `(v) 'ok' clear)\n  debug(udec(v), \"done\")\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        assert_eq!(resolved.find(source, 1, "debug").unwrap().kind, TokenKind::Debug);
        assert_eq!(resolved.find(source, 1, "term").unwrap().kind, TokenKind::DisplayType);
        let out = resolved.find(source, 1, "out").unwrap();
        assert_eq!(out.kind, TokenKind::DisplayName);
        assert!(out.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 1, "title").unwrap().kind, TokenKind::SetupParameter);
        assert_eq!(resolved.find(source, 1, "'Log'").unwrap().kind, TokenKind::String);
        assert_eq!(resolved.find(source, 1, "red").unwrap().kind, TokenKind::ColorName);

        let feed = resolved.find(source, 2, "out").unwrap();
        assert_eq!(feed.kind, TokenKind::DisplayName);
        assert!(!feed.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 2, "v").unwrap().kind, TokenKind::Variable);
        assert_eq!(resolved.find(source, 2, "clear").unwrap().kind, TokenKind::FeedParameter);

        assert_eq!(resolved.find(source, 3, "udec").unwrap().kind, TokenKind::Function);
        assert_eq!(resolved.find(source, 3, "\"done\"").unwrap().kind, TokenKind::String);
    }

    #[test]
    fn test_unknown_display_type() {
        let source = "PUB main()\n  debug(`bogus 1)\n";
        let resolved = resolve_source(source);
        assert_eq!(resolved.messages(), vec!["Unknown debug display type [bogus]"]);
    }
}
