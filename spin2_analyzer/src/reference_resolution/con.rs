//! CON: constants, enumerations and structures

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::declarations::statements::{parse_con_line, ConStatement, TypedName};
use crate::lexical::text::blank_strings;
use crate::lexical::LogicalLine;
use crate::tokens::{TokenKind, TokenModifier};

impl Resolver<'_, '_> {
    pub(super) fn resolve_con(&mut self, line: &LogicalLine, start: usize) {
        let code = line.code();
        let blanked = blank_strings(code);
        let expr = Expr {
            text: &line.text,
            code: &blanked,
            method: None,
            scope: Scope::Constant,
        };

        for statement in parse_con_line(code, start).statements {
            match statement {
                ConStatement::Constant { name, value } => {
                    self.emit_declaration(&line.text, name, None);
                    self.resolve_range(&expr, value.offset, value.end(), false);
                }
                ConStatement::EnumStart { value, step } => {
                    self.resolve_range(&expr, value.offset, value.end(), false);
                    if let Some(step) = step {
                        self.resolve_range(&expr, step.offset, step.end(), false);
                    }
                }
                ConStatement::EnumMember { name, step } => {
                    if self.symbols.is_global(name.text) {
                        self.emit_declaration(&line.text, name, None);
                    } else {
                        // not registered: debug keywords and P1 names
                        self.resolve_name(&expr, name, false);
                    }
                    if let Some(step) = step {
                        self.resolve_range(&expr, step.offset, step.end(), false);
                    }
                }
                ConStatement::Structure {
                    keyword,
                    name,
                    members,
                } => {
                    self.emit(&line.text, keyword, TokenKind::Keyword, &[]);
                    self.emit_declaration(&line.text, name, None);
                    for member in &members {
                        self.resolve_structure_member(&expr, member);
                    }
                }
                ConStatement::StructureAlias {
                    keyword,
                    name,
                    target,
                } => {
                    self.emit(&line.text, keyword, TokenKind::Keyword, &[]);
                    self.emit_declaration(&line.text, name, None);
                    self.resolve_type_word(&expr, target);
                }
            }
        }
    }

    fn resolve_structure_member(&mut self, expr: &Expr<'_>, member: &TypedName<'_>) {
        if let Some(type_name) = member.type_name {
            self.resolve_type_word(expr, type_name);
        }
        self.emit(
            expr.text,
            member.name,
            TokenKind::Property,
            &[TokenModifier::Declaration],
        );
        if let Some(count) = member.count {
            self.resolve_range(expr, count.offset, count.end(), false);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::reference_resolution::tests::resolve_source;
    use crate::tokens::{TokenKind, TokenModifier};

    #[test]
    fn test_constants_and_enums() {
        let source = "CON\n  BASE = 10, TOP = BASE * 2\n  #0, IDLE, BUSY[2], DONE\n  LIMIT = clkfreq / TOP\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        let base = resolved.find(source, 1, "BASE").unwrap();
        assert_eq!(base.kind, TokenKind::Variable);
        assert!(base.has_modifier(TokenModifier::Declaration));
        assert!(base.has_modifier(TokenModifier::Readonly));

        let use_of_base = resolved.find(source, 1, "BASE *").unwrap();
        assert!(!use_of_base.has_modifier(TokenModifier::Declaration));

        let busy = resolved.find(source, 2, "BUSY").unwrap();
        assert_eq!(busy.kind, TokenKind::EnumMember);
        assert!(busy.has_modifier(TokenModifier::Declaration));

        let clkfreq = resolved.find(source, 3, "clkfreq").unwrap();
        assert!(clkfreq.has_modifier(TokenModifier::DefaultLibrary));
    }

    #[test]
    fn test_structure_declarations() {
        let source = "CON\n  STRUCT point(x, y)\n  STRUCT box(point corner, byte tag[SIZE])\n  STRUCT pt = point\n  SIZE = 4\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        assert_eq!(resolved.find(source, 1, "STRUCT").unwrap().kind, TokenKind::Keyword);
        let point = resolved.find(source, 1, "point").unwrap();
        assert_eq!(point.kind, TokenKind::Struct);
        assert!(point.has_modifier(TokenModifier::Declaration));
        let x = resolved.find(source, 1, "x").unwrap();
        assert_eq!(x.kind, TokenKind::Property);

        assert_eq!(resolved.find(source, 2, "point").unwrap().kind, TokenKind::Struct);
        assert_eq!(resolved.find(source, 2, "byte").unwrap().kind, TokenKind::StorageType);
        assert_eq!(resolved.find(source, 2, "SIZE").unwrap().kind, TokenKind::Variable);

        let target = resolved.find(source, 3, "point").unwrap();
        assert_eq!(target.kind, TokenKind::Struct);
        assert!(!target.has_modifier(TokenModifier::Declaration));
    }

    #[test]
    fn test_structures_after_commas() {
        let source = "CON\n  X = 1, STRUCT point(x, y)\n  STRUCT a(m), STRUCT b(n)\n  STRUCT pair(point first, b second)\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        assert_eq!(resolved.find(source, 1, "STRUCT").unwrap().kind, TokenKind::Keyword);
        assert_eq!(resolved.find(source, 1, "point").unwrap().kind, TokenKind::Struct);
        assert_eq!(resolved.find(source, 2, "STRUCT b").unwrap().kind, TokenKind::Keyword);
        let b = resolved.find(source, 2, "b(").unwrap();
        assert_eq!(b.kind, TokenKind::Struct);
        assert!(b.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 3, "b second").unwrap().kind, TokenKind::Struct);
    }

    #[test]
    fn test_missing_constant() {
        let source = "CON\n  A = B + 1\n";
        let resolved = resolve_source(source);
        assert_eq!(resolved.messages(), vec!["Missing Constant Declaration [B]"]);
    }
}
