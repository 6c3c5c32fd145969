//! VAR: instance variables

use super::statements::{parse_var_line, TypedName};
use super::DeclarationScanner;
use crate::builtins::{is_storage_type, is_valid_symbol_name};
use crate::lexical::LogicalLine;
use crate::symbols::{Attachment, SymbolKind};
use crate::tokens::TokenModifier;

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_var(&mut self, line: &LogicalLine, start: usize) {
        for entry in parse_var_line(line.code(), start) {
            if !is_valid_symbol_name(entry.name.text) || is_storage_type(entry.name.text) {
                continue;
            }
            let mut symbol = self
                .symbol_at(line, entry.name, SymbolKind::Variable)
                .with_modifiers(&[TokenModifier::Instance]);
            if let Some(structure) = self.structure_type_of(&entry) {
                self.symbols
                    .record_instance(&structure, entry.name.text, entry.pointer);
                symbol = symbol.with_attachment(Attachment::StructureType {
                    name: structure,
                    pointer: entry.pointer,
                });
            }
            self.declare_global(symbol);
        }
    }

    /// Structure named by the entry's type word. Storage types and words
    /// that name no known structure bind nothing.
    pub(super) fn structure_type_of(&self, entry: &TypedName<'_>) -> Option<String> {
        let type_name = entry.type_name?;
        if is_storage_type(type_name.text) {
            return None;
        }
        let known = self.symbols.is_structure(type_name.text)
            || type_name
                .text
                .split_once('.')
                .is_some_and(|(instance, _)| self.symbols.namespace(instance).is_some());
        known.then(|| type_name.text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::declarations::tests::scan_source;
    use crate::symbols::SymbolKind;
    use crate::tokens::TokenModifier;

    #[test]
    fn test_instance_variables() {
        let (declarations, diagnostics) = scan_source("VAR\n  long count, buffer[16]\n  byte flags\n");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let buffer = declarations.symbols.lookup_global("buffer").unwrap();
        assert_eq!(buffer.kind, SymbolKind::Variable);
        assert!(buffer.has_modifier(TokenModifier::Instance));
        assert_eq!((buffer.decl_line, buffer.decl_column), (1, 14));
        assert!(declarations.symbols.is_global("flags"));
    }

    #[test]
    fn test_structure_instances() {
        let source = "CON\n  STRUCT point(x, y)\nVAR\n  point origin\n  ^point cursor\n  mystery thing\n";
        let (declarations, _) = scan_source(source);
        let symbols = &declarations.symbols;
        assert_eq!(symbols.resolve_instance_type(None, "origin"), Some("point"));
        assert!(symbols.is_pointer_instance(None, "cursor"));
        assert_eq!(
            symbols.lookup_global("cursor").and_then(|s| s.structure_type()),
            Some("point")
        );
        assert!(symbols.is_global("thing"));
        assert!(!symbols.is_global("mystery"));
        assert_eq!(symbols.resolve_instance_type(None, "thing"), None);
    }
}
