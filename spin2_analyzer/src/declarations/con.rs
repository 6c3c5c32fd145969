//! CON: constants, enumerations and STRUCT definitions

use super::statements::{parse_con_line, ConStatement, Piece, TypedName};
use super::DeclarationScanner;
use crate::builtins::{is_debug_invoke, is_p1_asm_variable, is_valid_symbol_name};
use crate::lexical::LogicalLine;
use crate::symbols::{ArraySize, MemberType, StructureDef, StructureMember, SymbolKind};
use crate::tokens::TokenModifier;

impl DeclarationScanner<'_, '_> {
    pub(super) fn scan_con(&mut self, line: &LogicalLine, start: usize) {
        let parsed = parse_con_line(line.code(), start);
        if parsed.is_enum {
            self.enum_in_progress = true;
        } else if !parsed.statements.is_empty() {
            self.enum_in_progress = false;
        }

        for statement in parsed.statements {
            match statement {
                ConStatement::Constant { name, .. } => {
                    if is_valid_symbol_name(name.text) {
                        let symbol = self.symbol_at(line, name, SymbolKind::Constant);
                        self.declare_global(symbol);
                    }
                }
                ConStatement::EnumMember { name, .. } => {
                    if is_debug_invoke(name.text)
                        || is_p1_asm_variable(name.text)
                        || !is_valid_symbol_name(name.text)
                    {
                        continue;
                    }
                    let symbol = self
                        .symbol_at(line, name, SymbolKind::EnumMember)
                        .with_modifiers(&[TokenModifier::Readonly]);
                    self.declare_global(symbol);
                }
                ConStatement::EnumStart { .. } => {}
                ConStatement::Structure { name, members, .. } => {
                    self.declare_structure(line, name, &members);
                }
                ConStatement::StructureAlias { name, target, .. } => {
                    let position = line.text.position_of(name.offset);
                    match self.symbols.declare_structure_alias(
                        name.text,
                        target.text,
                        position.line,
                        position.column,
                    ) {
                        Ok(()) => {
                            let symbol = self.symbol_at(line, name, SymbolKind::Structure);
                            self.declare_global(symbol);
                        }
                        Err(error) => self.report(error),
                    }
                }
            }
        }
    }

    fn declare_structure(&mut self, line: &LogicalLine, name: Piece<'_>, members: &[TypedName<'_>]) {
        let position = line.text.position_of(name.offset);
        let mut structure = StructureDef::new(name.text, position.line, position.column);
        for member in members {
            let member_position = line.text.position_of(member.name.offset);
            let entry = StructureMember {
                name: member.name.text.to_string(),
                member_type: member
                    .type_name
                    .map(|t| MemberType::from_word(t.text))
                    .unwrap_or(MemberType::Long),
                array_size: member.count.and_then(|c| ArraySize::parse(c.text)),
                line: member_position.line,
                column: member_position.column,
            };
            if let Err(error) = structure.add_member(entry) {
                self.report(error);
            }
        }

        self.context.logger.trace(|| {
            format!("structure {} with {} members", structure.name, structure.members.len())
        });
        match self.symbols.declare_structure(structure) {
            Ok(()) => {
                let symbol = self.symbol_at(line, name, SymbolKind::Structure);
                self.declare_global(symbol);
            }
            Err(error) => self.report(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::declarations::tests::{scan_source, scan_with};
    use crate::config::AnalyzerPreferences;
    use crate::logging::codes;
    use crate::symbols::{ArraySize, MemberType, SymbolKind};
    use crate::tokens::TokenModifier;

    #[test]
    fn test_constants_and_enums() {
        let source = "CON\n  CLK = 200_000_000, BAUD = 230_400\n  #0, IDLE, RUN[2], STOP\n\n  #10\n  FIRST\n  SECOND\n";
        let (declarations, diagnostics) = scan_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let symbols = &declarations.symbols;
        assert_eq!(symbols.lookup_global("clk").unwrap().kind, SymbolKind::Constant);
        let run = symbols.lookup_global("RUN").unwrap();
        assert_eq!(run.kind, SymbolKind::EnumMember);
        assert!(run.has_modifier(TokenModifier::Readonly));
        assert_eq!((run.decl_line, run.decl_column), (2, 12));
        assert!(symbols.is_global("FIRST"));
        assert!(symbols.is_global("SECOND"));
    }

    #[test]
    fn test_enum_skips_debug_and_p1_names() {
        let (declarations, _) = scan_source("CON\n  #0, DEBUG, PAR, OK\n");
        assert!(!declarations.symbols.is_global("DEBUG"));
        assert!(!declarations.symbols.is_global("PAR"));
        assert!(declarations.symbols.is_global("OK"));
    }

    #[test]
    fn test_structures_and_aliases() {
        let source = "CON\n  STRUCT point(x, y)\n  STRUCT line(point a, point b, byte color[3])\n  STRUCT pt = point\n";
        let (declarations, diagnostics) = scan_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let symbols = &declarations.symbols;
        let line = symbols.structure("line").unwrap();
        assert_eq!(line.members.len(), 3);
        assert_eq!(line.members[0].member_type, MemberType::Structure("point".to_string()));
        assert_eq!(line.members[2].member_type, MemberType::Byte);
        assert_eq!(line.members[2].array_size, Some(ArraySize::Count(3)));
        assert_eq!(symbols.structure("pt").unwrap().name, "point");
        assert_eq!(symbols.lookup_global("pt").unwrap().kind, SymbolKind::Structure);
    }

    #[test]
    fn test_structure_duplicates() {
        let source = "CON\n  STRUCT point(x, y, x)\n  STRUCT point(a)\n";
        let (_, diagnostics) = scan_with(source, &AnalyzerPreferences::default());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, codes::declarations::DUPLICATE_MEMBER);
        assert_eq!(diagnostics[0].message, "Duplicate member [x] in structure [point]");
        assert_eq!(
            diagnostics[1].message,
            "Duplicate structure [point] found earlier at line 2"
        );
    }
}
