//! Flexspin preprocessor symbols

use super::statements::{identifier_len, starts_identifier, Piece};
use super::DeclarationScanner;
use crate::lexical::text::{first_word, skip_whitespace};
use crate::lexical::LogicalLine;
use crate::symbols::SymbolKind;
use crate::tokens::TokenModifier;

/// Name following `#define`, if the line is one
pub(crate) fn defined_name(code: &str) -> Option<Piece<'_>> {
    let directive = first_word(code)?;
    if !directive.eq_ignore_case("#define") {
        return None;
    }
    let start = skip_whitespace(code, directive.end());
    if !starts_identifier(code, start) {
        return None;
    }
    let len = identifier_len(code, start);
    Some(Piece::new(start, &code[start..start + len]))
}

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_preprocessor(&mut self, line: &LogicalLine) {
        if !self.context.preferences.highlight_flexspin_directives {
            return;
        }
        if let Some(name) = defined_name(line.code()) {
            let symbol = self
                .symbol_at(line, name, SymbolKind::Variable)
                .with_modifiers(&[TokenModifier::Readonly]);
            self.declare_global(symbol);
        }
    }
}
