//! DAT data and assembly lines, inline assembly inside methods

use super::expressions::{Expr, Scope};
use super::Resolver;
use crate::builtins::{
    is_alignment, is_illegal_inline_pasm_directive, is_p1_asm_instruction, is_pasm_instruction,
    is_pasm_lang_directive, is_storage_type,
};
use crate::declarations::dat_local_scope;
use crate::declarations::statements::{parse_pasm_line, quoted_text, Piece};
use crate::lexical::text::blank_strings;
use crate::lexical::{LogicalLine, ParseState};
use crate::logging::codes;
use crate::tokens::{TokenKind, TokenModifier};

impl Resolver<'_, '_> {
    pub(super) fn resolve_pasm_line(&mut self, line: &LogicalLine, start: usize, method: Option<&str>) {
        let code = line.code();
        let inline = line.state == ParseState::InlineAsm;
        let method = if inline { method } else { None };
        let parsed = parse_pasm_line(code, start);

        if let Some(label) = parsed.label {
            self.resolve_label_declaration(line, label, method, inline);
        }
        if let Some(condition) = parsed.condition {
            self.emit(&line.text, condition, TokenKind::Keyword, &[]);
        }

        let scope = match parsed.mnemonic {
            Some(mnemonic) => match self.resolve_mnemonic(line, mnemonic, method, inline) {
                Some(scope) => scope,
                None => return,
            },
            None => Scope::Data,
        };
        if let Some(operands) = parsed.operands {
            let blanked = blank_strings(code);
            let expr = Expr {
                text: &line.text,
                code: &blanked,
                method,
                scope,
            };
            self.resolve_range(&expr, operands.offset, operands.end(), false);
        }
    }

    fn resolve_label_declaration(
        &mut self,
        line: &LogicalLine,
        label: Piece<'_>,
        method: Option<&str>,
        inline: bool,
    ) {
        if label.text.starts_with(':') {
            self.emit(&line.text, label, TokenKind::Label, &[TokenModifier::IllegalUse]);
            return;
        }
        let symbols = self.symbols;
        let found = if inline {
            method.and_then(|m| symbols.lookup_pasm_label(m, label.text))
        } else if label.text.starts_with('.') {
            symbols.lookup_pasm_label(&dat_local_scope(&self.dat_scope), label.text)
        } else {
            self.dat_scope = label.text.to_string();
            symbols.lookup_global(label.text)
        };
        if let Some(symbol) = found {
            self.emit_set(&line.text, label, symbol.kind.token_kind(), symbol.declaration_modifiers());
        }
    }

    /// Token for the instruction or directive word. Returns the scope its
    /// operands resolve in, or None when the line is fully handled.
    fn resolve_mnemonic(
        &mut self,
        line: &LogicalLine,
        mnemonic: Piece<'_>,
        method: Option<&str>,
        inline: bool,
    ) -> Option<Scope> {
        let lower = mnemonic.text.to_ascii_lowercase();
        match lower.as_str() {
            "debug" => {
                self.resolve_debug(line, method, mnemonic.offset);
                return None;
            }
            "file" => {
                if inline {
                    self.illegal_inline_directive(line, mnemonic);
                } else {
                    self.emit(&line.text, mnemonic, TokenKind::StorageType, &[]);
                }
                if let Some(filename) = quoted_text(line.code(), mnemonic.end()) {
                    self.emit(&line.text, filename, TokenKind::Filename, &[]);
                }
                return None;
            }
            _ => {}
        }

        if inline && is_illegal_inline_pasm_directive(&lower) {
            self.illegal_inline_directive(line, mnemonic);
            return Some(Scope::Pasm);
        }
        if is_storage_type(&lower) || is_alignment(&lower) || lower == "res" {
            self.emit(&line.text, mnemonic, TokenKind::StorageType, &[]);
            return Some(Scope::Data);
        }
        if self.symbols.is_structure(mnemonic.text) {
            self.emit(&line.text, mnemonic, TokenKind::Struct, &[]);
            return Some(Scope::Data);
        }
        if is_pasm_lang_directive(&lower, self.version) || is_pasm_instruction(&lower) {
            self.emit(&line.text, mnemonic, TokenKind::Keyword, &[]);
            return Some(Scope::Pasm);
        }
        if is_p1_asm_instruction(&lower) {
            self.emit(&line.text, mnemonic, TokenKind::Keyword, &[TokenModifier::IllegalUse]);
            self.error(
                &line.text,
                mnemonic,
                codes::dialect::P1_INSTRUCTION,
                format!("P1 pasm instruction [{}] not allowed in P2 pasm", mnemonic.text),
            );
            return Some(Scope::Pasm);
        }

        let blanked = blank_strings(line.code());
        let expr = Expr {
            text: &line.text,
            code: &blanked,
            method,
            scope: Scope::Pasm,
        };
        self.resolve_name(&expr, mnemonic, false);
        Some(Scope::Pasm)
    }

    fn illegal_inline_directive(&mut self, line: &LogicalLine, mnemonic: Piece<'_>) {
        self.emit(&line.text, mnemonic, TokenKind::Keyword, &[TokenModifier::IllegalUse]);
        self.error(
            &line.text,
            mnemonic,
            codes::dialect::ILLEGAL_INLINE_DIRECTIVE,
            format!("Illegal P2 Spin inline-pasm directive [{}]", mnemonic.text),
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::reference_resolution::tests::resolve_source;
    use crate::tokens::{TokenKind, TokenModifier};

    #[test]
    fn test_dat_assembly() {
        let source = "CON\n  PIN = 56\nDAT\n        org 0\nentry   drvh #PIN\n.loop   if_z  add count, #1 wc\n        djnz count, #.loop\n        jmp #entry\ncount   long 0\nfont    file \"font.bin\"\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

        assert_eq!(resolved.find(source, 3, "org").unwrap().kind, TokenKind::Keyword);
        let entry = resolved.find(source, 4, "entry").unwrap();
        assert_eq!(entry.kind, TokenKind::Label);
        assert!(entry.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 4, "PIN").unwrap().kind, TokenKind::Variable);

        let local = resolved.find(source, 5, ".loop").unwrap();
        assert!(local.has_modifier(TokenModifier::Declaration));
        assert_eq!(resolved.find(source, 5, "if_z").unwrap().kind, TokenKind::Keyword);
        assert_eq!(resolved.find(source, 5, "wc").unwrap().kind, TokenKind::Keyword);

        let jump = resolved.find(source, 6, ".loop").unwrap();
        assert_eq!(jump.kind, TokenKind::Label);
        assert!(!jump.has_modifier(TokenModifier::Declaration));

        assert_eq!(resolved.find(source, 8, "long").unwrap().kind, TokenKind::StorageType);
        assert_eq!(resolved.find(source, 9, "font.bin").unwrap().kind, TokenKind::Filename);
    }

    #[test]
    fn test_p1_assembly_is_flagged() {
        let source = "DAT\n        org 0\n:loop   mov a, cnt\n        jmpret a, #0\n        add a, #1 nr\na       long 0\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec![
                "P1 pasm local name [:loop] not supported in P2 pasm",
                "P1 Spin/PASM variable [cnt] not allowed in P2",
                "P1 pasm instruction [jmpret] not allowed in P2 pasm",
                "P1 pasm effect [nr] not allowed in P2 pasm",
            ]
        );
    }

    #[test]
    fn test_inline_assembly() {
        let source = "PUB main(pin) | t\n  org\n.wait   testp pin wc\n  if_nc jmp #.wait\n        mov t, #0\n        alignl\n  end\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec!["Illegal P2 Spin inline-pasm directive [alignl]"]
        );
        let wait = resolved.find(source, 3, ".wait").unwrap();
        assert_eq!(wait.kind, TokenKind::Label);
        assert_eq!(resolved.find(source, 2, "pin").unwrap().kind, TokenKind::Parameter);
        assert_eq!(resolved.find(source, 4, "t,").unwrap().kind, TokenKind::Variable);
        assert_eq!(resolved.find(source, 6, "end").unwrap().kind, TokenKind::Keyword);
    }
}
