//! DAT data and assembly labels, inline assembly labels and FILE includes

use super::statements::{parse_pasm_line, quoted_text, Piece};
use super::{dat_local_scope, DeclarationScanner};
use crate::builtins::is_storage_type;
use crate::lexical::LogicalLine;
use crate::logging::codes;
use crate::symbols::{Attachment, SymbolKind};
use crate::tokens::TokenModifier;

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_dat(&mut self, line: &LogicalLine, start: usize, inline: bool) {
        let code = line.code();
        let parsed = parse_pasm_line(code, start);
        let mnemonic = parsed.mnemonic.map(|m| m.text.to_ascii_lowercase());

        if let Some(label) = parsed.label {
            self.declare_label(line, label, mnemonic.as_deref(), parsed.mnemonic, inline);
        }

        match (mnemonic.as_deref(), parsed.mnemonic) {
            (Some("debug"), Some(word)) => self.scan_debug_displays(line, word.offset),
            (Some("file"), Some(word)) if !inline => {
                if let Some(filename) = quoted_text(code, word.end()) {
                    self.check_data_file(line, filename);
                }
            }
            _ => {}
        }
    }

    fn declare_label(
        &mut self,
        line: &LogicalLine,
        label: Piece<'_>,
        mnemonic: Option<&str>,
        mnemonic_piece: Option<Piece<'_>>,
        inline: bool,
    ) {
        if label.text.starts_with(':') {
            self.error_at(
                &line.text,
                label,
                codes::dialect::P1_LOCAL_LABEL,
                format!("P1 pasm local name [{}] not supported in P2 pasm", label.text),
            );
            return;
        }

        let is_local = label.text.starts_with('.');
        let structure = mnemonic_piece
            .filter(|m| self.symbols.is_structure(m.text))
            .map(|m| m.text.to_string());
        let kind = if mnemonic.is_some_and(is_storage_type) || structure.is_some() {
            SymbolKind::Variable
        } else {
            SymbolKind::Label
        };

        let mut modifiers = Vec::new();
        if inline {
            modifiers.push(TokenModifier::PasmInline);
        }
        if is_local {
            modifiers.push(TokenModifier::Static);
        }
        let mut symbol = self.symbol_at(line, label, kind).with_modifiers(&modifiers);

        if mnemonic == Some("file") {
            if let Some(filename) = mnemonic_piece.and_then(|m| quoted_text(line.code(), m.end())) {
                symbol = symbol.with_attachment(Attachment::Filename(filename.text.to_string()));
            }
        }
        if let Some(structure) = structure {
            self.symbols.record_instance(&structure, label.text, false);
            symbol = symbol.with_attachment(Attachment::StructureType {
                name: structure,
                pointer: false,
            });
        }

        self.context
            .logger
            .trace(|| format!("label {} ({})", symbol.name, symbol.kind.as_str()));
        let result = if inline {
            let method = self.current_method.clone();
            self.symbols.declare_pasm_label(method.as_deref(), symbol)
        } else if is_local {
            let scope = dat_local_scope(&self.dat_scope);
            self.symbols.declare_pasm_label(Some(&scope), symbol)
        } else {
            self.dat_scope = label.text.to_string();
            self.symbols.declare_global(symbol)
        };
        if let Err(error) = result {
            self.report(error);
        }
    }

    fn check_data_file(&mut self, line: &LogicalLine, filename: Piece<'_>) {
        if filename.text.contains('/') {
            self.error_at(
                &line.text,
                filename,
                codes::declarations::INVALID_FILENAME,
                format!("Invalid filename character \"/\" in [{}]", filename.text),
            );
            return;
        }
        let context = self.context;
        if !context
            .collaborators
            .file_system
            .file_exists(context.directory, filename.text)
        {
            self.error_at(
                &line.text,
                filename,
                codes::declarations::MISSING_DATA_FILE,
                format!("Missing data file [{}]", filename.text),
            );
        }
    }
}
