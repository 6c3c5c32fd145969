//! Pass 1: declaration scanning
//!
//! Walks the document once and records every declared name (constants,
//! enums, structures, variables, object instances, methods with their
//! parameters/returns/locals, DAT and inline assembly labels, debug display
//! names) together with block, method, assembly and comment spans. No
//! reference is resolved here; pass 2 reads the table this pass builds.

mod con;
mod dat;
pub(crate) mod debug;
mod methods;
pub(crate) mod obj;
pub(crate) mod preprocessor;
pub mod statements;
mod var;

use crate::config::AnalyzerPreferences;
use crate::diagnostics::{DiagnosticCollector, DiagnosticSeverity};
use crate::findings::{BlockKind, Findings};
use crate::lexical::{ContinuedLines, LineKind, LineWalker, LogicalLine, ParseState, WalkItem};
use crate::logging::{codes::Code, LoggingService};
use crate::pipeline::Collaborators;
use crate::symbols::{Symbol, SymbolError, SymbolKind, SymbolTable};
use crate::utils::Position;
use statements::Piece;

/// Everything pass 1 hands to pass 2
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    pub symbols: SymbolTable,
    pub findings: Findings,
    /// `{Spin2_v##}` version, 0 when absent
    pub version: u32,
}

/// Read-only inputs shared by both passes
pub struct AnalysisContext<'a> {
    pub collaborators: Collaborators<'a>,
    /// Directory OBJ and FILE names are checked against
    pub directory: &'a str,
    pub preferences: &'a AnalyzerPreferences,
    pub logger: &'a LoggingService,
}

/// Scope key for DAT `.local` labels, which live under the preceding global label
pub(crate) fn dat_local_scope(global_label: &str) -> String {
    format!("@{global_label}")
}

/// Run pass 1 over `lines`, reporting declaration errors into `diagnostics`
pub fn scan(
    lines: &[String],
    context: &AnalysisContext<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> Declarations {
    let mut walker = LineWalker::new(lines, context.collaborators.line_filter);
    let mut scanner = DeclarationScanner::new(context, diagnostics);

    for item in walker.by_ref() {
        match item {
            WalkItem::Line(line) => scanner.scan_line(&line),
            WalkItem::Blank { .. } => scanner.enum_in_progress = false,
            WalkItem::Comment { .. } => {}
        }
    }

    let version = walker.version();
    let last_line = lines.len().saturating_sub(1);
    let (symbols, mut findings) = scanner.finish(last_line);
    for comment in walker.take_comment_spans() {
        findings.record_comment(comment);
    }
    findings.finish(last_line);

    context.logger.trace(|| {
        format!(
            "pass 1: {} globals, {} methods, {} structures, version {}",
            symbols.global_count(),
            symbols.method_count(),
            symbols.structures().len(),
            version
        )
    });

    Declarations {
        symbols,
        findings,
        version,
    }
}

pub(crate) struct DeclarationScanner<'a, 'd> {
    context: &'a AnalysisContext<'a>,
    diagnostics: &'d mut DiagnosticCollector,
    symbols: SymbolTable,
    findings: Findings,
    enum_in_progress: bool,
    current_method: Option<String>,
    /// Set while scanning a method whose name was already taken
    duplicate_method: bool,
    /// Last global DAT label, owner of following `.local` labels
    dat_scope: String,
    dat_pasm_open: bool,
    last_dat_pasm_line: usize,
}

impl<'a, 'd> DeclarationScanner<'a, 'd> {
    fn new(context: &'a AnalysisContext<'a>, diagnostics: &'d mut DiagnosticCollector) -> Self {
        Self {
            context,
            diagnostics,
            symbols: SymbolTable::new(),
            findings: Findings::new(),
            enum_in_progress: false,
            current_method: None,
            duplicate_method: false,
            dat_scope: String::new(),
            dat_pasm_open: false,
            last_dat_pasm_line: 0,
        }
    }

    fn finish(mut self, last_line: usize) -> (SymbolTable, Findings) {
        if self.dat_pasm_open {
            self.findings.end_pasm(self.last_dat_pasm_line);
        }
        self.findings.end_method(last_line);
        (self.symbols, self.findings)
    }

    fn scan_line(&mut self, line: &LogicalLine) {
        self.track_dat_pasm(line);

        match line.kind {
            LineKind::SectionStart { kind, body_offset } => {
                self.start_section(line, kind);
                match kind {
                    BlockKind::Con => self.scan_con(line, body_offset),
                    BlockKind::Var => self.scan_var(line, body_offset),
                    BlockKind::Obj => self.scan_obj(line, body_offset),
                    BlockKind::Pub | BlockKind::Pri => {
                        self.scan_method_header(line, kind == BlockKind::Pub, body_offset)
                    }
                    BlockKind::Dat => self.scan_dat(line, body_offset, false),
                }
            }
            LineKind::Preprocessor => self.scan_preprocessor(line),
            LineKind::PasmStart => self.findings.begin_pasm(line.first_line(), true),
            LineKind::PasmEnd => self.findings.end_pasm(line.text.last_line()),
            LineKind::Code => match line.state {
                ParseState::Con => self.scan_con(line, 0),
                ParseState::Var => self.scan_var(line, 0),
                ParseState::Obj => self.scan_obj(line, 0),
                ParseState::Pub | ParseState::Pri => self.scan_debug_displays(line, 0),
                ParseState::Dat | ParseState::DatAsm => self.scan_dat(line, 0, false),
                ParseState::InlineAsm => self.scan_dat(line, 0, true),
                ParseState::BlockComment | ParseState::DocBlockComment => {}
            },
        }
    }

    fn start_section(&mut self, line: &LogicalLine, kind: BlockKind) {
        let first = line.first_line();
        self.findings.end_method(first.saturating_sub(1));
        self.current_method = None;
        self.duplicate_method = false;
        self.enum_in_progress = false;
        self.findings.record_block_start(kind, first);
    }

    /// DAT assembly spans follow the walker's `DatAsm` state
    fn track_dat_pasm(&mut self, line: &LogicalLine) {
        if line.state == ParseState::DatAsm {
            if !self.dat_pasm_open {
                self.findings.begin_pasm(line.first_line(), false);
                self.dat_pasm_open = true;
            }
            self.last_dat_pasm_line = line.text.last_line();
        } else if self.dat_pasm_open {
            self.findings.end_pasm(self.last_dat_pasm_line);
            self.dat_pasm_open = false;
        }
    }

    // Shared helpers

    fn position(text: &ContinuedLines, piece: Piece<'_>) -> Position {
        text.position_of(piece.offset)
    }

    /// Symbol named by `piece`, positioned on its physical line
    fn symbol_at(
        &self,
        line: &LogicalLine,
        piece: Piece<'_>,
        kind: SymbolKind,
    ) -> Symbol {
        let position = Self::position(&line.text, piece);
        Symbol::new(piece.text, kind, position.line, position.column)
            .with_comment(line.doc_comment.clone())
    }

    fn declare_global(&mut self, symbol: Symbol) {
        self.context
            .logger
            .trace(|| format!("declare {} {}", symbol.kind.as_str(), symbol.name));
        if let Err(error) = self.symbols.declare_global(symbol) {
            self.report(error);
        }
    }

    fn report(&mut self, error: SymbolError) {
        self.diagnostics.push_span(
            error.span(),
            DiagnosticSeverity::Error,
            error.error_code(),
            error.to_string(),
        );
    }

    fn error_at(&mut self, text: &ContinuedLines, piece: Piece<'_>, code: Code, message: String) {
        let position = Self::position(text, piece);
        self.diagnostics
            .error(position.line, position.column, piece.text.len(), code, message);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::pipeline::{AllLinesEnabled, DisabledLines, MapNamespaces, NoFileSystem};
    use crate::tokens::TokenModifier;

    pub(crate) fn lines(source: &str) -> Vec<String> {
        source.lines().map(str::to_string).collect()
    }

    pub(crate) fn scan_source(source: &str) -> (Declarations, Vec<crate::diagnostics::Diagnostic>) {
        scan_with(source, &AnalyzerPreferences::default())
    }

    pub(crate) fn scan_with(
        source: &str,
        preferences: &AnalyzerPreferences,
    ) -> (Declarations, Vec<crate::diagnostics::Diagnostic>) {
        let logger = LoggingService::disabled();
        let namespaces = MapNamespaces::new();
        let context = AnalysisContext {
            collaborators: Collaborators::new(&NoFileSystem, &namespaces, &AllLinesEnabled),
            directory: ".",
            preferences,
            logger: &logger,
        };
        let mut diagnostics = DiagnosticCollector::new();
        let declarations = scan(&lines(source), &context, &mut diagnostics);
        (declarations, diagnostics.finish(usize::MAX))
    }

    #[test]
    fn test_spans_and_version() {
        let source = "{Spin2_v45}\nCON\n  X = 1\nPUB main()\n  org\n    nop\n  end\nPRI helper()\nDAT\n  org 0\n  nop\n  fit\n";
        let (declarations, diagnostics) = scan_source(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(declarations.version, 45);

        let methods = declarations.findings.methods();
        assert_eq!(methods.len(), 2);
        assert_eq!((methods[0].start_line, methods[0].end_line), (3, 6));
        assert_eq!((methods[1].start_line, methods[1].end_line), (7, 7));

        let pasm = declarations.findings.pasm_spans();
        assert_eq!(pasm.len(), 2);
        assert!(pasm[0].inline);
        assert_eq!((pasm[0].start_line, pasm[0].end_line), (4, 6));
        assert!(!pasm[1].inline);
        assert_eq!((pasm[1].start_line, pasm[1].end_line), (9, 11));

        let kinds: Vec<BlockKind> = declarations.findings.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Con, BlockKind::Con, BlockKind::Pub, BlockKind::Pri, BlockKind::Dat]
        );
    }

    #[test]
    fn test_disabled_lines_declare_nothing() {
        let logger = LoggingService::disabled();
        let namespaces = MapNamespaces::new();
        let filter = DisabledLines::new([2]);
        let preferences = AnalyzerPreferences::default();
        let context = AnalysisContext {
            collaborators: Collaborators::new(&NoFileSystem, &namespaces, &filter),
            directory: ".",
            preferences: &preferences,
            logger: &logger,
        };
        let mut diagnostics = DiagnosticCollector::new();
        let declarations = scan(&lines("CON\n  A = 1\n  B = 2\n"), &context, &mut diagnostics);
        assert!(declarations.symbols.is_global("A"));
        assert!(!declarations.symbols.is_global("B"));
    }

    #[test]
    fn test_duplicate_reports_first_line() {
        let (declarations, diagnostics) = scan_source("CON\n  X = 1\nVAR\n  long x\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, codes::declarations::DUPLICATE_DECLARATION);
        assert_eq!(diagnostics[0].message, "Duplicate declaration [x] found earlier at line 2");
        assert_eq!(diagnostics[0].line(), 3);
        let symbol = declarations.symbols.lookup_global("X").unwrap();
        assert_eq!(symbol.kind, SymbolKind::Constant);
        assert!(!symbol.has_modifier(TokenModifier::Instance));
    }
}
