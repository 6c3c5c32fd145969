//! OBJ: instance declarations and constant overrides

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::declarations::statements::parse_obj_line;
use crate::lexical::text::blank_strings;
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::tokens::{TokenKind, TokenModifier};

impl Resolver<'_, '_> {
    pub(super) fn resolve_obj(&mut self, line: &LogicalLine, start: usize) {
        let code = line.code();
        // malformed lines were reported by pass 1
        let Ok(declaration) = parse_obj_line(code, start) else {
            return;
        };
        let blanked = blank_strings(code);
        let expr = Expr {
            text: &line.text,
            code: &blanked,
            method: None,
            scope: Scope::Constant,
        };

        self.emit_declaration(&line.text, declaration.instance, None);
        if let Some(count) = declaration.count {
            self.resolve_range(&expr, count.offset, count.end(), false);
        }
        self.emit(&line.text, declaration.filename, TokenKind::Filename, &[]);

        let symbols = self.symbols;
        let table = symbols
            .namespace(declaration.instance.text)
            .and_then(|import| self.public_table(import));
        let instance = declaration.instance.text;

        for (name, value) in &declaration.overrides {
            match &table {
                Some(table) if table.constant(name.text).is_some() => {
                    self.emit(
                        &line.text,
                        *name,
                        TokenKind::Variable,
                        &[TokenModifier::Readonly],
                    );
                }
                Some(_) => {
                    self.emit(&line.text, *name, TokenKind::Variable, &[TokenModifier::IllegalUse]);
                    self.error(
                        &line.text,
                        *name,
                        codes::references::OBJECT_MEMBER_NOT_FOUND,
                        format!("Object Constant [{}] not found in [{instance}]", name.text),
                    );
                }
                None => {}
            }
            if let Some(value) = value {
                self.resolve_range(&expr, value.offset, value.end(), false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AnalyzerPreferences;
    use crate::pipeline::{AllLinesEnabled, MapNamespaces};
    use crate::reference_resolution::tests::resolve_full;
    use crate::symbols::{PublicSymbolTable, Symbol, SymbolKind};
    use crate::tokens::{TokenKind, TokenModifier};

    #[test]
    fn test_obj_overrides_checked_against_child() {
        let mut table = PublicSymbolTable::new();
        table.add_constant(Symbol::new("BAUD", SymbolKind::Constant, 0, 2));
        let mut namespaces = MapNamespaces::new();
        namespaces.insert("uart.spin2", table);

        let source = "CON\n  RATE = 9600\nOBJ\n  com[2] : \"uart\" | BAUD = RATE, PARITY = 1\n";
        let resolved = resolve_full(
            source,
            &AnalyzerPreferences::default(),
            &namespaces,
            &AllLinesEnabled,
        );
        assert_eq!(
            resolved.messages(),
            vec!["Object Constant [PARITY] not found in [com]"]
        );

        let com = resolved.find(source, 3, "com").unwrap();
        assert_eq!(com.kind, TokenKind::Namespace);
        assert!(com.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 3, "uart").unwrap().kind, TokenKind::Filename);
        assert!(resolved
            .find(source, 3, "BAUD")
            .unwrap()
            .has_modifier(TokenModifier::Readonly));
        assert_eq!(resolved.find(source, 3, "RATE").unwrap().kind, TokenKind::Variable);
    }
}
