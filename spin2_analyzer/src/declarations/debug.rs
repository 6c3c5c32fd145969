//! User debug displays: `` debug(`term name ...) `` declares `name`

use super::statements::{identifier_len, matching_close, starts_identifier, Piece};
use super::DeclarationScanner;
use crate::builtins::{display_type_for, DebugDisplayType};
use crate::findings::DebugDisplay;
use crate::lexical::text::{blank_strings, index_of_word, skip_whitespace};
use crate::lexical::LogicalLine;
use crate::symbols::SymbolKind;
use crate::tokens::TokenModifier;

/// A `` `type name `` pair opening a display declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DisplayDeclaration<'a> {
    pub type_word: Piece<'a>,
    pub display_type: Option<DebugDisplayType>,
    pub name: Option<Piece<'a>>,
}

/// Byte range inside the parens of the `debug(...)` starting at `at`
pub(crate) fn debug_arguments(code: &str, blanked: &str, at: usize) -> Option<(usize, usize)> {
    let mut position = skip_whitespace(code, at + "debug".len());
    if blanked.as_bytes().get(position) == Some(&b'[') {
        position = skip_whitespace(code, matching_close(blanked, position)? + 1);
    }
    if blanked.as_bytes().get(position) != Some(&b'(') {
        return None;
    }
    let close = matching_close(blanked, position).unwrap_or(code.len());
    Some((position + 1, close))
}

/// The `` `word name `` at the start of a debug argument list, if present
pub(crate) fn display_declaration(code: &str, open: usize) -> Option<DisplayDeclaration<'_>> {
    let tick = skip_whitespace(code, open);
    if code.as_bytes().get(tick) != Some(&b'`') || !starts_identifier(code, tick + 1) {
        return None;
    }
    let type_len = identifier_len(code, tick + 1);
    let type_word = Piece::new(tick + 1, &code[tick + 1..tick + 1 + type_len]);
    let name_start = skip_whitespace(code, type_word.end());
    let name = starts_identifier(code, name_start).then(|| {
        let len = identifier_len(code, name_start);
        Piece::new(name_start, &code[name_start..name_start + len])
    });
    Some(DisplayDeclaration {
        type_word,
        display_type: display_type_for(type_word.text),
        name,
    })
}

impl DeclarationScanner<'_, '_> {
    /// Record every display declared by `debug(...)` calls at or after `from`
    pub(super) fn scan_debug_displays(&mut self, line: &LogicalLine, from: usize) {
        let code = line.code();
        let blanked = blank_strings(code);
        let mut search = from;
        while let Some(at) = index_of_word(&blanked, "debug", search) {
            search = at + "debug".len();
            let Some((open, _)) = debug_arguments(code, &blanked, at) else {
                continue;
            };
            let Some(declaration) = display_declaration(code, open) else {
                continue;
            };
            let (Some(display_type), Some(name)) = (declaration.display_type, declaration.name) else {
                continue;
            };
            self.record_display(line, name, display_type);
        }
    }

    fn record_display(&mut self, line: &LogicalLine, name: Piece<'_>, display_type: DebugDisplayType) {
        if self.findings.display(name.text).is_some() {
            return;
        }
        let position = line.text.position_of(name.offset);
        self.findings.record_debug_display(DebugDisplay {
            name: name.text.to_string(),
            display_type,
            line: position.line,
        });
        let symbol = self
            .symbol_at(line, name, SymbolKind::DisplayName)
            .with_comment(None)
            .with_modifiers(&[TokenModifier::Readonly]);
        self.declare_global(symbol);
    }
}
