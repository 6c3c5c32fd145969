//! VAR: instance variables

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::declarations::statements::parse_var_line;
use crate::lexical::text::blank_strings;
use crate::lexical::LogicalLine;
use crate::tokens::TokenKind;

impl Resolver<'_, '_> {
    pub(super) fn resolve_var(&mut self, line: &LogicalLine, start: usize) {
        let code = line.code();
        let blanked = blank_strings(code);
        let expr = Expr {
            text: &line.text,
            code: &blanked,
            method: None,
            scope: Scope::Constant,
        };

        for entry in parse_var_line(code, start) {
            if let Some(alignment) = entry.alignment {
                self.emit(&line.text, alignment, TokenKind::StorageType, &[]);
            }
            if let Some(type_name) = entry.type_name {
                self.resolve_type_word(&expr, type_name);
            }
            self.emit_declaration(&line.text, entry.name, None);
            if let Some(count) = entry.count {
                self.resolve_range(&expr, count.offset, count.end(), false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::reference_resolution::tests::resolve_source;
    use crate::tokens::{TokenKind, TokenModifier};

    #[test]
    fn test_var_declarations() {
        let source = "CON\n  N = 8\n  STRUCT point(x, y)\nVAR\n  long a, b[N]\n  ^point cursor\n  byte buf[M]\n";
        let resolved = resolve_source(source);
        assert_eq!(resolved.messages(), vec!["Missing Constant Declaration [M]"]);

        assert_eq!(resolved.find(source, 4, "long").unwrap().kind, TokenKind::StorageType);
        let b = resolved.find(source, 4, "b").unwrap();
        assert_eq!(b.kind, TokenKind::Variable);
        assert!(b.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 4, "N").unwrap().kind, TokenKind::Variable);

        assert_eq!(resolved.find(source, 5, "point").unwrap().kind, TokenKind::Struct);
        let cursor = resolved.find(source, 5, "cursor").unwrap();
        assert!(cursor.has_modifier(TokenModifier::Instance));
    }
}
