//! Expression scanning shared by every section
//!
//! An expression is scanned lexeme by lexeme. A name resolves against the
//! symbol table first, then the built-in tables, then the P1 tables; a name
//! found nowhere is a missing declaration. `inst.NAME`, `inst#NAME` and
//! `var.member` forms resolve as object or structure references.

use super::Resolver;
use crate::builtins::{
    classify, classify_debug, classify_p1, classify_pasm, is_alignment, is_no_paren_method,
    is_storage_type, BuiltinCategory,
};
use crate::declarations::dat_local_scope;
use crate::declarations::statements::{identifier_len, matching_close, starts_identifier, Piece};
use crate::lexical::ContinuedLines;
use crate::logging::codes;
use crate::symbols::{ObjectImport, SymbolKind};
use crate::tokens::{TokenKind, TokenModifier};

/// Where an expression sits: decides lookups, built-in tables and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// CON values, VAR counts and OBJ overrides
    Constant,
    /// Method bodies
    Spin,
    /// DAT data values
    Data,
    /// Assembly operands, DAT or inline
    Pasm,
    /// `debug(...)` arguments
    Debug,
}

/// Code being resolved and the context it is resolved in
pub(crate) struct Expr<'l> {
    pub text: &'l ContinuedLines,
    /// Logical code with string literals blanked
    pub code: &'l str,
    pub method: Option<&'l str>,
    pub scope: Scope,
}

impl<'l> Expr<'l> {
    pub fn piece(&self, start: usize, end: usize) -> Piece<'l> {
        Piece::new(start, &self.code[start..end])
    }
}

/// `name[index].member`, `inst#NAME` or `inst%NAME`
#[derive(Debug, Clone, Copy)]
struct Compound<'l> {
    name: Piece<'l>,
    index: Option<(usize, usize)>,
    separator: u8,
    member: Piece<'l>,
}

fn byte_at(code: &str, at: usize) -> Option<u8> {
    code.as_bytes().get(at).copied()
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

pub(crate) fn next_non_space(code: &str, from: usize) -> Option<u8> {
    code.as_bytes()
        .get(from..)?
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

fn prev_non_space(code: &str, before: usize) -> Option<u8> {
    code.as_bytes()
        .get(..before)?
        .iter()
        .rev()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

/// `@name`, `@@name`: taking an address needs no parentheses
fn is_address_of(code: &str, offset: usize) -> bool {
    prev_non_space(code, offset) == Some(b'@')
}

/// Numeric literal body: digits, letters, `_`, and a `.` only before a digit
fn skip_number(bytes: &[u8], mut at: usize, end: usize) -> usize {
    while at < end {
        let byte = bytes[at];
        let decimal_point = byte == b'.' && bytes.get(at + 1).is_some_and(u8::is_ascii_digit);
        if !(is_word_byte(byte) || decimal_point) {
            break;
        }
        at += 1;
    }
    at
}

/// `++`, `--`, `!!`, `~~` or `~` applied directly to the name
fn is_modified_in_place(code: &str, start: usize, end: usize) -> bool {
    let after = &code[end..];
    let before = &code[..start];
    ["++", "--", "!!", "~~"].iter().any(|op| after.starts_with(op))
        || (after.starts_with('~') && !after.starts_with("~>"))
        || ["++", "--"].iter().any(|op| before.ends_with(op))
}

/// Token for a built-in name; None for P1-only names
pub(crate) fn builtin_token(category: BuiltinCategory) -> Option<(TokenKind, &'static [TokenModifier])> {
    use BuiltinCategory as C;
    use TokenModifier as M;
    let token: (TokenKind, &'static [TokenModifier]) = match category {
        C::BlockName
        | C::SpinReserved
        | C::SpinControlFlow
        | C::PasmInstruction
        | C::PasmLangDirective
        | C::PasmEffect => (TokenKind::Keyword, &[]),
        C::StorageType | C::Alignment => (TokenKind::StorageType, &[]),
        C::BinaryOperator | C::UnaryOperator => (TokenKind::Operator, &[]),
        C::NumericSymbol
        | C::ClockSymbol
        | C::CoginitSymbol
        | C::TaskSymbol
        | C::HardwareConstant
        | C::DebugControlSymbol
        | C::PasmReserved => (TokenKind::Variable, &[M::Readonly, M::DefaultLibrary]),
        C::HubVariable | C::CogRegister => (TokenKind::Variable, &[M::DefaultLibrary]),
        C::FloatConversion | C::BuiltinMethod | C::MethodPointerOp | C::DebugMethod => {
            (TokenKind::Function, &[M::DefaultLibrary])
        }
        C::DebugInvoke => (TokenKind::Debug, &[M::DefaultLibrary]),
        C::DebugColor => (TokenKind::ColorName, &[]),
        C::FlexspinDirective => (TokenKind::Directive, &[]),
        C::P1AsmInstruction
        | C::P1AsmEffect
        | C::P1AsmVariable
        | C::P1SpinMethod
        | C::P1SpinVariable => return None,
    };
    Some(token)
}

impl Resolver<'_, '_> {
    /// Resolve every name in `code[start..end]`. `lhs` marks names at bracket
    /// depth 0 as modified.
    pub(super) fn resolve_range(&mut self, expr: &Expr<'_>, start: usize, end: usize, lhs: bool) {
        let code = expr.code;
        let bytes = code.as_bytes();
        let end = end.min(code.len());
        let mut depth = 0i32;
        let mut at = start;

        while at < end {
            let byte = bytes[at];
            let follows_word = at > 0 && is_word_byte(bytes[at - 1]);
            match byte {
                b'(' | b'[' => {
                    depth += 1;
                    at += 1;
                }
                b')' | b']' => {
                    depth -= 1;
                    at += 1;
                }
                b'$' => at = skip_number(bytes, at + 1, end),
                b'%' if !follows_word => {
                    let digits = if bytes.get(at + 1) == Some(&b'%') { at + 2 } else { at + 1 };
                    at = skip_number(bytes, digits, end);
                }
                b'0'..=b'9' if !follows_word => at = skip_number(bytes, at, end),
                b'.' if !follows_word
                    && matches!(expr.scope, Scope::Pasm | Scope::Data)
                    && starts_identifier(code, at + 1) =>
                {
                    let label_end = at + 1 + identifier_len(code, at + 1);
                    self.resolve_local_label(expr, expr.piece(at, label_end));
                    at = label_end;
                }
                // member of something already consumed
                b'.' if starts_identifier(code, at + 1) => {
                    at += 1 + identifier_len(code, at + 1);
                }
                _ if (byte.is_ascii_alphabetic() || byte == b'_') && !follows_word => {
                    at = self.resolve_lexeme(expr, at, end, lhs && depth <= 0);
                }
                _ => at += 1,
            }
        }
    }

    /// Resolve the lexeme starting at `start`; returns where scanning resumes
    fn resolve_lexeme(&mut self, expr: &Expr<'_>, start: usize, end: usize, lhs: bool) -> usize {
        let code = expr.code;
        let name_end = start + identifier_len(code, start);
        let name = expr.piece(start, name_end);

        let mut cursor = name_end;
        let mut index = None;
        if byte_at(code, cursor) == Some(b'[') {
            if let Some(close) = matching_close(code, cursor) {
                if byte_at(code, close + 1) == Some(b'.') && starts_identifier(code, close + 2) {
                    index = Some((cursor + 1, close));
                    cursor = close + 1;
                }
            }
        }

        let separator = byte_at(code, cursor).filter(|b| matches!(b, b'.' | b'#' | b'%'));
        if let Some(separator) = separator {
            if cursor + 1 < end && starts_identifier(code, cursor + 1) {
                let member_end = cursor + 1 + identifier_len(code, cursor + 1);
                let reference = Compound {
                    name,
                    index,
                    separator,
                    member: expr.piece(cursor + 1, member_end),
                };
                return self.resolve_compound(expr, &reference, lhs).max(name_end);
            }
        }

        self.resolve_name(expr, name, lhs);
        name_end
    }

    fn resolve_compound(&mut self, expr: &Expr<'_>, reference: &Compound<'_>, lhs: bool) -> usize {
        let symbols = self.symbols;
        let member_end = reference.member.end();

        if reference.separator == b'#' {
            self.resolve_p1_constant_reference(expr, reference);
            return member_end;
        }
        if let Some(import) = symbols.namespace(reference.name.text) {
            self.resolve_object_reference(expr, reference, import);
            return member_end;
        }
        if reference.separator == b'.' {
            if let Some(structure) = symbols.resolve_instance_type(expr.method, reference.name.text) {
                return self.resolve_structure_chain(expr, reference, structure, lhs);
            }
            if symbols.lookup(expr.method, reference.name.text).is_some() {
                self.resolve_name(expr, reference.name, lhs);
                if let Some((start, end)) = reference.index {
                    self.resolve_range(expr, start, end, false);
                }
                if is_storage_type(reference.member.text) {
                    self.emit(expr.text, reference.member, TokenKind::StorageType, &[]);
                }
                return member_end;
            }
        }

        self.emit(
            expr.text,
            reference.name,
            TokenKind::Variable,
            &[TokenModifier::MissingDeclaration],
        );
        self.error(
            expr.text,
            reference.name,
            codes::references::MISSING_OBJECT_INSTANCE,
            format!("Missing object instance declaration [{}]", reference.name.text),
        );
        self.emit(expr.text, reference.member, TokenKind::Variable, &[TokenModifier::IllegalUse]);
        member_end
    }

    /// `inst#NAME` is the P1 spelling of `inst.NAME`
    fn resolve_p1_constant_reference(&mut self, expr: &Expr<'_>, reference: &Compound<'_>) {
        let symbols = self.symbols;
        if let Some(symbol) = symbols.lookup(expr.method, reference.name.text) {
            self.emit_set(expr.text, reference.name, symbol.kind.token_kind(), symbol.reference_modifiers());
        }
        let member = reference.member;
        let marked = expr.piece(member.offset - 1, member.end());
        self.emit(expr.text, member, TokenKind::Variable, &[TokenModifier::IllegalUse]);
        self.error(
            expr.text,
            marked,
            codes::dialect::P1_SYNTAX,
            format!("P1 Style Constant Reference [{}] not allowed in P2 spin", marked.text),
        );
    }

    fn resolve_object_reference(&mut self, expr: &Expr<'_>, reference: &Compound<'_>, import: &ObjectImport) {
        let symbols = self.symbols;
        if let Some(symbol) = symbols.lookup_global(reference.name.text) {
            self.emit_set(expr.text, reference.name, symbol.kind.token_kind(), symbol.reference_modifiers());
        }
        if let Some((start, end)) = reference.index {
            self.resolve_range(expr, start, end, false);
        }
        // Unresolvable objects already carry a missing-file diagnostic
        let Some(table) = self.public_table(import) else {
            return;
        };

        let member = reference.member;
        let instance = reference.name.text;
        let is_call = next_non_space(expr.code, member.end()) == Some(b'(');

        if reference.separator != b'%' && is_call {
            if table.method(member.text).is_some() {
                self.emit(expr.text, member, TokenKind::Method, &[]);
            } else {
                self.emit(expr.text, member, TokenKind::Method, &[TokenModifier::IllegalUse]);
                self.error(
                    expr.text,
                    member,
                    codes::references::OBJECT_MEMBER_NOT_FOUND,
                    format!("Object Method [{}()] not found in [{instance}]", member.text),
                );
            }
            return;
        }

        if let Some(constant) = table.constant(member.text) {
            let mut modifiers = constant.reference_modifiers();
            modifiers.insert(TokenModifier::Readonly);
            self.emit_set(expr.text, member, constant.kind.token_kind(), modifiers);
        } else if reference.separator == b'.' && table.structure(member.text).is_some() {
            self.emit(expr.text, member, TokenKind::Struct, &[]);
        } else if reference.separator == b'.' && table.method(member.text).is_some() {
            self.emit(expr.text, member, TokenKind::Method, &[]);
            if expr.scope == Scope::Spin && !is_address_of(expr.code, reference.name.offset) {
                self.error(
                    expr.text,
                    member,
                    codes::references::METHOD_REQUIRES_PARENS,
                    format!("Method [{}] requires parentheses", member.text),
                );
            }
        } else {
            self.emit(expr.text, member, TokenKind::Variable, &[TokenModifier::IllegalUse]);
            self.error(
                expr.text,
                member,
                codes::references::OBJECT_MEMBER_NOT_FOUND,
                format!("Object Constant [{}] not found in [{instance}]", member.text),
            );
        }
    }

    /// `var.member[.member...]` through structure definitions
    fn resolve_structure_chain(
        &mut self,
        expr: &Expr<'_>,
        reference: &Compound<'_>,
        structure: &str,
        lhs: bool,
    ) -> usize {
        let symbols = self.symbols;
        let code = expr.code;
        self.resolve_name(expr, reference.name, lhs);
        if let Some((start, end)) = reference.index {
            self.resolve_range(expr, start, end, false);
        }

        let mut current = symbols.structure(structure).map(|s| s.name.clone());
        let mut cursor = reference.member.offset - 1;
        while byte_at(code, cursor) == Some(b'.') && starts_identifier(code, cursor + 1) {
            let start = cursor + 1;
            let member = expr.piece(start, start + identifier_len(code, start));
            cursor = member.end();
            if is_storage_type(member.text) {
                self.emit(expr.text, member, TokenKind::StorageType, &[]);
                break;
            }

            match current.as_deref().and_then(|name| symbols.structure(name)) {
                Some(definition) => match definition.member(member.text) {
                    Some(field) => {
                        self.emit(expr.text, member, TokenKind::Property, &[]);
                        current = field.member_type.structure_name().map(str::to_string);
                    }
                    None => {
                        self.emit(expr.text, member, TokenKind::Property, &[TokenModifier::IllegalUse]);
                        self.error(
                            expr.text,
                            member,
                            codes::references::UNKNOWN_MEMBER,
                            format!("Unknown member [{}] in structure [{}]", member.text, definition.name),
                        );
                        break;
                    }
                },
                None => {
                    self.emit(expr.text, member, TokenKind::Property, &[]);
                    current = None;
                }
            }

            if byte_at(code, cursor) == Some(b'[') {
                if let Some(close) = matching_close(code, cursor) {
                    self.resolve_range(expr, cursor + 1, close, false);
                    cursor = close + 1;
                }
            }
        }
        cursor
    }

    /// A lone name
    pub(super) fn resolve_name(&mut self, expr: &Expr<'_>, name: Piece<'_>, lhs: bool) {
        if self.is_emitted(expr.text, name.offset) {
            return;
        }
        let code = expr.code;
        let is_call = next_non_space(code, name.end()) == Some(b'(');
        let is_address = is_address_of(code, name.offset);
        let symbols = self.symbols;

        if let Some(symbol) = symbols.lookup(expr.method, name.text) {
            let mut modifiers = symbol.reference_modifiers();
            let modified =
                expr.scope == Scope::Spin && (lhs || is_modified_in_place(code, name.offset, name.end()));
            if modified
                && matches!(
                    symbol.kind,
                    SymbolKind::Variable | SymbolKind::Parameter | SymbolKind::ReturnValue
                )
            {
                modifiers.insert(TokenModifier::Modification);
            }
            self.emit_set(expr.text, name, symbol.kind.token_kind(), modifiers);
            if symbol.kind == SymbolKind::Method && expr.scope == Scope::Spin && !is_call && !is_address {
                self.error(
                    expr.text,
                    name,
                    codes::references::METHOD_REQUIRES_PARENS,
                    format!("Method [{}] requires parentheses", name.text),
                );
            }
            return;
        }

        let category = match expr.scope {
            Scope::Pasm | Scope::Data => classify_pasm(name.text, self.version),
            Scope::Debug => classify_debug(name.text, self.version),
            Scope::Constant | Scope::Spin => classify(name.text, self.version),
        };
        match category.or_else(|| classify_p1(name.text)) {
            Some(category) => self.resolve_builtin(expr, name, category, is_call || is_address),
            None => self.report_missing(expr, name),
        }
    }

    fn resolve_builtin(
        &mut self,
        expr: &Expr<'_>,
        name: Piece<'_>,
        category: BuiltinCategory,
        has_parens: bool,
    ) {
        if let Some((kind, modifiers)) = builtin_token(category) {
            self.emit(expr.text, name, kind, modifiers);
            let wants_parens = matches!(
                category,
                BuiltinCategory::BuiltinMethod | BuiltinCategory::FloatConversion
            );
            if !wants_parens || has_parens {
                return;
            }
            match expr.scope {
                Scope::Spin if !is_no_paren_method(name.text) => self.error(
                    expr.text,
                    name,
                    codes::references::MISSING_PARENS,
                    format!("Missing parens after [{}]", name.text),
                ),
                Scope::Constant if category == BuiltinCategory::FloatConversion => self.error(
                    expr.text,
                    name,
                    codes::references::MISSING_PARENS,
                    format!("CON missing parens [{}]", name.text),
                ),
                _ => {}
            }
            return;
        }

        let (kind, code, message) = match category {
            BuiltinCategory::P1SpinMethod => (
                TokenKind::Method,
                codes::dialect::P1_NAME,
                format!("P1 Spin method [{}()] not allowed in P2 Spin", name.text),
            ),
            BuiltinCategory::P1SpinVariable => (
                TokenKind::Variable,
                codes::dialect::P1_NAME,
                format!("P1 Spin variable [{}] not allowed in P2 Spin", name.text),
            ),
            BuiltinCategory::P1AsmInstruction => (
                TokenKind::Keyword,
                codes::dialect::P1_INSTRUCTION,
                format!("P1 pasm instruction [{}] not allowed in P2 pasm", name.text),
            ),
            BuiltinCategory::P1AsmEffect => (
                TokenKind::Keyword,
                codes::dialect::P1_INSTRUCTION,
                format!("P1 pasm effect [{}] not allowed in P2 pasm", name.text),
            ),
            _ => (
                TokenKind::Variable,
                codes::dialect::P1_NAME,
                format!("P1 Spin/PASM variable [{}] not allowed in P2", name.text),
            ),
        };
        self.emit(expr.text, name, kind, &[TokenModifier::IllegalUse]);
        self.error(expr.text, name, code, message);
    }

    fn report_missing(&mut self, expr: &Expr<'_>, name: Piece<'_>) {
        self.emit(expr.text, name, TokenKind::Variable, &[TokenModifier::MissingDeclaration]);
        let message = match expr.scope {
            Scope::Constant => format!("Missing Constant Declaration [{}]", name.text),
            Scope::Pasm => format!("Missing PASM label/constant [{}]", name.text),
            Scope::Spin | Scope::Data | Scope::Debug => format!("Missing Declaration [{}]", name.text),
        };
        self.error(expr.text, name, codes::references::MISSING_DECLARATION, message);
    }

    /// `.name` in assembly: scoped to the method (inline) or the last global
    /// DAT label
    fn resolve_local_label(&mut self, expr: &Expr<'_>, label: Piece<'_>) {
        let symbols = self.symbols;
        let found = match expr.method {
            Some(method) => symbols.lookup_pasm_label(method, label.text),
            None => symbols.lookup_pasm_label(&dat_local_scope(&self.dat_scope), label.text),
        };
        match found {
            Some(symbol) => {
                self.emit_set(expr.text, label, symbol.kind.token_kind(), symbol.reference_modifiers());
            }
            None => {
                self.emit(expr.text, label, TokenKind::Label, &[TokenModifier::MissingDeclaration]);
                self.error(
                    expr.text,
                    label,
                    codes::references::MISSING_DECLARATION,
                    format!("Missing PASM label/constant [{}]", label.text),
                );
            }
        }
    }

    /// Type word of a declaration: storage type, alignment or structure
    pub(super) fn resolve_type_word(&mut self, expr: &Expr<'_>, word: Piece<'_>) {
        if is_storage_type(word.text) || is_alignment(word.text) {
            self.emit(expr.text, word, TokenKind::StorageType, &[]);
        } else if self.symbols.is_structure(word.text) {
            self.emit(expr.text, word, TokenKind::Struct, &[]);
        } else {
            self.resolve_range(expr, word.offset, word.end(), false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerPreferences;
    use crate::pipeline::{AllLinesEnabled, MapNamespaces};
    use crate::reference_resolution::tests::{resolve_full, resolve_source};
    use crate::symbols::{MethodSignature, PublicSymbolTable, Symbol};

    #[test]
    fn test_number_skipping() {
        let bytes = b"1_000.5e3 + x";
        assert_eq!(skip_number(bytes, 0, bytes.len()), 9);
        let bytes = b"0..count";
        assert_eq!(skip_number(bytes, 0, bytes.len()), 1);
    }

    #[test]
    fn test_in_place_modification() {
        assert!(is_modified_in_place("x++", 0, 1));
        assert!(is_modified_in_place("--x", 2, 3));
        assert!(is_modified_in_place("x~", 0, 1));
        assert!(!is_modified_in_place("x~>2", 0, 1));
        assert!(!is_modified_in_place("x + 1", 0, 1));
    }

    #[test]
    fn test_builtin_tokens() {
        assert_eq!(
            builtin_token(BuiltinCategory::BuiltinMethod),
            Some((TokenKind::Function, &[TokenModifier::DefaultLibrary][..]))
        );
        assert_eq!(builtin_token(BuiltinCategory::DebugColor).map(|t| t.0), Some(TokenKind::ColorName));
        assert!(builtin_token(BuiltinCategory::P1SpinMethod).is_none());
    }

    #[test]
    fn test_missing_names_by_section() {
        let source = "CON\n  X = NOPE\nPUB main()\n  y := 1\nDAT\n        org\n        jmp #away\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec![
                "Missing Constant Declaration [NOPE]",
                "Missing Declaration [y]",
                "Missing PASM label/constant [away]",
            ]
        );
        let token = resolved.find(source, 1, "NOPE").unwrap();
        assert!(token.has_modifier(TokenModifier::MissingDeclaration));
    }

    #[test]
    fn test_parens_rules() {
        let source = "CON\n  F = float 3\nPUB main() | t\n  t := getct\n  t := helper\n  t := @helper\n  abort\nPRI helper() : r\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec![
                "CON missing parens [float]",
                "Missing parens after [getct]",
                "Method [helper] requires parentheses",
            ]
        );
        let call = resolved.find(source, 5, "helper").unwrap();
        assert_eq!(call.kind, TokenKind::Method);
    }

    #[test]
    fn test_p1_names() {
        let source = "PUB main()\n  cognew(@x, 0)\n  result := cnt\nDAT\nx       long 0\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec![
                "P1 Spin method [cognew()] not allowed in P2 Spin",
                "P1 Spin variable [result] not allowed in P2 Spin",
                "P1 Spin/PASM variable [cnt] not allowed in P2",
            ]
        );
        assert!(resolved
            .find(source, 1, "cognew")
            .unwrap()
            .has_modifier(TokenModifier::IllegalUse));
    }

    #[test]
    fn test_structure_member_chains() {
        let source = "CON\n  STRUCT point(x, y)\n  STRUCT line(point a, point b)\nVAR\n  line seg\nPUB main()\n  seg.a.x := seg.b.z\n";
        let resolved = resolve_source(source);
        assert_eq!(resolved.messages(), vec!["Unknown member [z] in structure [point]"]);

        let root = resolved.find(source, 6, "seg").unwrap();
        assert_eq!(root.kind, TokenKind::Variable);
        assert!(root.has_modifier(TokenModifier::Modification));
        let x = resolved.find(source, 6, "x :=").unwrap();
        assert_eq!(x.kind, TokenKind::Property);
        let z = resolved.find(source, 6, "z").unwrap();
        assert!(z.has_modifier(TokenModifier::IllegalUse));
    }

    #[test]
    fn test_object_references() {
        let mut table = PublicSymbolTable::new();
        table.add_constant(Symbol::new("BAUD", SymbolKind::Constant, 1, 2));
        table.add_method(MethodSignature::new("start", true, 3, 4));
        let mut namespaces = MapNamespaces::new();
        namespaces.insert("serial.spin2", table);

        let source = "OBJ\n  ser : \"serial\"\nPUB main()\n  ser.start(ser.BAUD)\n  ser.stop()\n  ser.WIDTH\n  ser#BAUD\n  ser.start\n  nope.go()\n";
        let resolved = resolve_full(
            source,
            &AnalyzerPreferences::default(),
            &namespaces,
            &AllLinesEnabled,
        );
        assert_eq!(
            resolved.messages(),
            vec![
                "Object Method [stop()] not found in [ser]",
                "Object Constant [WIDTH] not found in [ser]",
                "P1 Style Constant Reference [#BAUD] not allowed in P2 spin",
                "Method [start] requires parentheses",
                "Missing object instance declaration [nope]",
            ]
        );
        assert_eq!(resolved.find(source, 3, "ser").unwrap().kind, TokenKind::Namespace);
        assert_eq!(resolved.find(source, 3, "start").unwrap().kind, TokenKind::Method);
        let baud = resolved.find(source, 3, "BAUD").unwrap();
        assert_eq!(baud.kind, TokenKind::Variable);
        assert!(baud.has_modifier(TokenModifier::Readonly));
    }

    #[test]
    fn test_unresolved_object_is_silent() {
        let source = "OBJ\n  ser : \"serial\"\nPUB main()\n  ser.start()\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        assert_eq!(resolved.find(source, 3, "ser").unwrap().kind, TokenKind::Namespace);
        assert!(resolved.find(source, 3, "start").is_none());
    }
}
