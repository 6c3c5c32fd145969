//! PUB/PRI signatures and method body statements

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::declarations::statements::{parse_method_header, Piece, TypedName};
use crate::lexical::text::{blank_strings, index_of_word, words};
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::tokens::{TokenKind, TokenModifier};

/// Assignment operators, longest spelling first so `+//=` wins over `//=`
const ASSIGNMENT_OPERATORS: &[&str] = &[
    "+//=", "+/=", "//=", "#>=", "<#=", "<<=", ">>=", "->=", "<-=", "~>=", "><=", "&&=", "||=",
    "^^=", "**=", ":=", "+=", "-=", "*=", "/=", "&=", "|=", "^=",
];

/// Byte range of the first top-level assignment operator
pub(crate) fn find_assignment(code: &str) -> Option<(usize, usize)> {
    let bytes = code.as_bytes();
    let mut depth = 0i32;
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'=' if depth <= 0 && bytes.get(index + 1) != Some(&b'=') => {
                let end = index + 1;
                let found = ASSIGNMENT_OPERATORS
                    .iter()
                    .find(|op| end >= op.len() && code.get(end - op.len()..end) == Some(**op));
                if let Some(op) = found {
                    return Some((end - op.len(), end));
                }
            }
            _ => {}
        }
    }
    None
}

impl Resolver<'_, '_> {
    pub(super) fn resolve_signature(&mut self, line: &LogicalLine, is_public: bool, start: usize) {
        let code = line.code();
        let Some(header) = parse_method_header(code, start) else {
            return;
        };
        let blanked = blank_strings(code);
        let method = header.name.text;
        let expr = Expr {
            text: &line.text,
            code: &blanked,
            method: Some(method),
            scope: Scope::Spin,
        };

        let symbols = self.symbols;
        match symbols.lookup_global(method).filter(|s| s.decl_line == line.text.position_of(header.name.offset).line) {
            Some(symbol) => {
                self.emit_set(&line.text, header.name, TokenKind::Method, symbol.declaration_modifiers());
            }
            None => {
                let modifiers: &[TokenModifier] = if is_public {
                    &[TokenModifier::Declaration]
                } else {
                    &[TokenModifier::Declaration, TokenModifier::Static]
                };
                self.emit(&line.text, header.name, TokenKind::Method, modifiers);
            }
        }

        for entry in header
            .parameters
            .iter()
            .chain(&header.returns)
            .chain(&header.locals)
        {
            self.resolve_local_declaration(&expr, entry);
        }
    }

    fn resolve_local_declaration(&mut self, expr: &Expr<'_>, entry: &TypedName<'_>) {
        if let Some(alignment) = entry.alignment {
            self.emit(expr.text, alignment, TokenKind::StorageType, &[]);
        }
        if let Some(type_name) = entry.type_name {
            self.resolve_type_word(expr, type_name);
        }
        self.emit_declaration(expr.text, entry.name, expr.method);
        if let Some(count) = entry.count {
            self.resolve_range(expr, count.offset, count.end(), false);
        }

        let symbols = self.symbols;
        if self.context.preferences.report_hidden_globals && symbols.is_global(entry.name.text) {
            self.information(
                expr.text,
                entry.name,
                codes::declarations::HIDES_GLOBAL,
                format!(
                    "Local name [{}] is hiding global variable of same name",
                    entry.name.text
                ),
            );
        }
    }

    pub(super) fn resolve_spin_statement(&mut self, line: &LogicalLine, method: Option<&str>) {
        let code = line.code();
        let mut masked = blank_strings(code);

        let found = words(&masked);
        if let [first, second, ..] = found.as_slice() {
            if first.eq_ignore_case("else") && second.eq_ignore_case("if") {
                let span = Piece::new(first.offset, &code[first.offset..second.end()]);
                self.emit(&line.text, Piece::new(first.offset, first.text), TokenKind::Keyword, &[]);
                self.emit(&line.text, Piece::new(second.offset, second.text), TokenKind::Keyword, &[]);
                self.error(
                    &line.text,
                    span,
                    codes::dialect::ILLEGAL_ELSE_IF,
                    "Illegal \"else if\" form for P2 Spin".to_string(),
                );
            }
        }

        // debug() calls resolve on their own, then drop out of the statement
        let mut search = 0;
        while let Some(at) = index_of_word(&masked, "debug", search) {
            let resume = self.resolve_debug(line, method, at);
            search = resume.max(at + "debug".len());
            if resume > at {
                masked.replace_range(at..resume, &" ".repeat(resume - at));
            }
        }

        let expr = Expr {
            text: &line.text,
            code: &masked,
            method,
            scope: Scope::Spin,
        };
        match find_assignment(&masked) {
            Some((op_start, op_end)) => {
                self.resolve_range(&expr, 0, op_start, true);
                self.resolve_range(&expr, op_end, masked.len(), false);
            }
            None => self.resolve_range(&expr, 0, masked.len(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerPreferences;
    use crate::pipeline::{AllLinesEnabled, MapNamespaces};
    use crate::reference_resolution::tests::{resolve_full, resolve_source};

    #[test]
    fn test_find_assignment() {
        assert_eq!(find_assignment("x := 1"), Some((2, 4)));
        assert_eq!(find_assignment("x +//= 3"), Some((2, 6)));
        assert_eq!(find_assignment("a[i := 2] += 1"), Some((10, 12)));
        assert_eq!(find_assignment("if a == b"), None);
        assert_eq!(find_assignment("if a <= b"), None);
        assert_eq!(find_assignment("x <<= 2"), Some((2, 5)));
    }

    #[test]
    fn test_signature_tokens() {
        let source = "CON\n  STRUCT point(x, y)\nPUB start(pin, point p) : ok | i, byte buf[4]\nPRI helper()\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        let start = resolved.find(source, 2, "start").unwrap();
        assert_eq!(start.kind, TokenKind::Method);
        assert!(start.has_modifier(TokenModifier::Declaration));
        let pin = resolved.find(source, 2, "pin").unwrap();
        assert_eq!(pin.kind, TokenKind::Parameter);
        assert!(pin.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 2, "point").unwrap().kind, TokenKind::Struct);
        assert_eq!(resolved.find(source, 2, "ok").unwrap().kind, TokenKind::ReturnValue);
        assert_eq!(resolved.find(source, 2, "byte").unwrap().kind, TokenKind::StorageType);

        let helper = resolved.find(source, 3, "helper").unwrap();
        assert!(helper.has_modifier(TokenModifier::Static));
    }

    #[test]
    fn test_statement_modifications() {
        let source = "VAR\n  long total, count\nPUB main() | i\n  repeat i from 0 to 9\n    total += i\n    count++\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        assert_eq!(resolved.find(source, 3, "repeat").unwrap().kind, TokenKind::Keyword);
        let i = resolved.find(source, 3, "i from").unwrap();
        assert_eq!(i.kind, TokenKind::Variable);
        assert!(i.has_modifier(TokenModifier::Local));
        assert!(resolved
            .find(source, 4, "total")
            .unwrap()
            .has_modifier(TokenModifier::Modification));
        assert!(!resolved
            .find(source, 4, "i")
            .unwrap()
            .has_modifier(TokenModifier::Modification));
        assert!(resolved
            .find(source, 5, "count")
            .unwrap()
            .has_modifier(TokenModifier::Modification));
    }

    #[test]
    fn test_else_if_is_rejected() {
        let source = "PUB main() | a\n  if a\n    a := 1\n  else if a > 2\n    a := 0\n";
        let resolved = resolve_source(source);
        assert_eq!(resolved.messages(), vec!["Illegal \"else if\" form for P2 Spin"]);
        assert_eq!(resolved.diagnostics[0].line(), 3);
    }

    #[test]
    fn test_hidden_globals_reported_on_request() {
        let source = "VAR\n  long count\nPUB main() | count\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty());

        let preferences = AnalyzerPreferences {
            report_hidden_globals: true,
            ..AnalyzerPreferences::default()
        };
        let resolved = resolve_full(source, &preferences, &MapNamespaces::new(), &AllLinesEnabled);
        assert_eq!(
            resolved.messages(),
            vec!["Local name [count] is hiding global variable of same name"]
        );
        assert!(!resolved.diagnostics[0].is_error());
    }
}
