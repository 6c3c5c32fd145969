//! Pass 2: reference resolution
//!
//! Walks the document a second time with the symbol table pass 1 built,
//! emitting one semantic token per recognized name and a diagnostic for every
//! reference that does not resolve or uses a construct P2 rejects. Columns
//! are byte offsets here; the pipeline converts them to characters.

mod con;
mod debug;
mod expressions;
mod obj;
mod pasm;
mod spin;
mod var;

use crate::declarations::statements::Piece;
use crate::declarations::{AnalysisContext, Declarations};
use crate::diagnostics::DiagnosticCollector;
use crate::findings::{BlockKind, Findings};
use crate::lexical::text::first_word;
use crate::lexical::{CommentRange, ContinuedLines, LineKind, LineWalker, LogicalLine, ParseState, WalkItem};
use crate::logging::codes::{self, Code};
use crate::symbols::{ObjectImport, PublicSymbolTable, SymbolTable};
use crate::tokens::{Token, TokenKind, TokenModifier, TokenSet};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Run pass 2 over `lines`, returning the semantic tokens
pub fn resolve(
    lines: &[String],
    declarations: &Declarations,
    context: &AnalysisContext<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> TokenSet {
    let filter = context.collaborators.line_filter;
    let mut walker = LineWalker::new(lines, filter);
    let mut resolver = Resolver::new(context, declarations, diagnostics);

    for item in walker.by_ref() {
        match item {
            WalkItem::Line(line) => resolver.resolve_line(&line),
            WalkItem::Comment { line, ranges } => {
                for range in &ranges {
                    resolver.emit_comment(line, range);
                }
            }
            WalkItem::Blank { line } => {
                if filter.is_line_disabled(line) {
                    let length = lines.get(line).map_or(0, String::len);
                    resolver.emit_disabled_line(line, length);
                }
            }
        }
    }

    let tokens = resolver.tokens;
    context.logger.trace(|| format!("pass 2: {} tokens", tokens.len()));
    tokens
}

pub(crate) struct Resolver<'a, 'd> {
    context: &'a AnalysisContext<'a>,
    symbols: &'a SymbolTable,
    findings: &'a Findings,
    version: u32,
    diagnostics: &'d mut DiagnosticCollector,
    tokens: TokenSet,
    /// Public tables of imported objects, keyed by lowercase instance name
    namespace_cache: HashMap<String, Option<Arc<PublicSymbolTable>>>,
    /// Last global DAT label, owner of following `.local` references
    dat_scope: String,
}

impl<'a, 'd> Resolver<'a, 'd> {
    fn new(
        context: &'a AnalysisContext<'a>,
        declarations: &'a Declarations,
        diagnostics: &'d mut DiagnosticCollector,
    ) -> Self {
        Self {
            context,
            symbols: &declarations.symbols,
            findings: &declarations.findings,
            version: declarations.version,
            diagnostics,
            tokens: TokenSet::new(),
            namespace_cache: HashMap::new(),
            dat_scope: String::new(),
        }
    }

    fn resolve_line(&mut self, line: &LogicalLine) {
        for (physical, range) in &line.comments {
            self.emit_comment(*physical, range);
        }
        let method = self
            .findings
            .method_at(line.first_line())
            .map(|m| m.name.as_str());

        match line.kind {
            LineKind::SectionStart { kind, body_offset } => {
                self.emit_section_keyword(line);
                match kind {
                    BlockKind::Con => self.resolve_con(line, body_offset),
                    BlockKind::Var => self.resolve_var(line, body_offset),
                    BlockKind::Obj => self.resolve_obj(line, body_offset),
                    BlockKind::Pub | BlockKind::Pri => {
                        self.resolve_signature(line, kind == BlockKind::Pub, body_offset)
                    }
                    BlockKind::Dat => self.resolve_pasm_line(line, body_offset, None),
                }
            }
            LineKind::Preprocessor => self.resolve_preprocessor(line),
            LineKind::PasmStart | LineKind::PasmEnd => self.resolve_pasm_line(line, 0, method),
            LineKind::Code => match line.state {
                ParseState::Con => self.resolve_con(line, 0),
                ParseState::Var => self.resolve_var(line, 0),
                ParseState::Obj => self.resolve_obj(line, 0),
                ParseState::Pub | ParseState::Pri => self.resolve_spin_statement(line, method),
                ParseState::Dat | ParseState::DatAsm => self.resolve_pasm_line(line, 0, None),
                ParseState::InlineAsm => self.resolve_pasm_line(line, 0, method),
                ParseState::BlockComment | ParseState::DocBlockComment => {}
            },
        }
    }

    fn emit_section_keyword(&mut self, line: &LogicalLine) {
        if let Some(word) = first_word(line.code()) {
            self.emit(&line.text, Piece::new(word.offset, word.text), TokenKind::Keyword, &[]);
        }
    }

    /// Flexspin `#define`/`#ifdef`... lines
    fn resolve_preprocessor(&mut self, line: &LogicalLine) {
        let code = line.code();
        let Some(directive) = first_word(code) else {
            return;
        };
        let directive = Piece::new(directive.offset, directive.text);
        if !self.context.preferences.highlight_flexspin_directives {
            self.emit(&line.text, directive, TokenKind::Directive, &[TokenModifier::IllegalUse]);
            self.error(
                &line.text,
                directive,
                codes::dialect::UNSUPPORTED_PREPROCESSOR,
                format!("P2 Spin - PreProcessor Directive [{}] not supported!", directive.text),
            );
            return;
        }

        self.emit(&line.text, directive, TokenKind::Directive, &[]);
        if let Some(name) = crate::declarations::preprocessor::defined_name(code) {
            let symbols = self.symbols;
            if let Some(symbol) = symbols.lookup_global(name.text) {
                self.emit_set(&line.text, name, symbol.kind.token_kind(), symbol.declaration_modifiers());
            }
            return;
        }
        let rest = directive.end();
        if let Some(word) = first_word(&code[rest..]) {
            let name = Piece::new(rest + word.offset, word.text);
            let symbols = self.symbols;
            if let Some(symbol) = symbols.lookup_global(name.text) {
                self.emit_set(&line.text, name, symbol.kind.token_kind(), symbol.reference_modifiers());
            }
        }
    }

    // Emission

    fn emit_comment(&mut self, line: usize, range: &CommentRange) {
        let modifiers: &[TokenModifier] = if range.is_documentation() {
            &[TokenModifier::Documentation]
        } else {
            &[]
        };
        self.tokens
            .record(Token::new(line, range.start, range.len(), TokenKind::Comment, modifiers));
    }

    /// One disabled comment token covers a line switched off by the preprocessor
    fn emit_disabled_line(&mut self, line: usize, length: usize) {
        self.tokens.drop_line(line);
        self.tokens.record(Token::new(
            line,
            0,
            length,
            TokenKind::Comment,
            &[TokenModifier::Disabled],
        ));
    }

    fn is_emitted(&self, text: &ContinuedLines, offset: usize) -> bool {
        let position = text.position_of(offset);
        self.tokens.contains_position(position.line, position.column)
    }

    fn emit(
        &mut self,
        text: &ContinuedLines,
        piece: Piece<'_>,
        kind: TokenKind,
        modifiers: &[TokenModifier],
    ) -> bool {
        self.emit_set(text, piece, kind, modifiers.iter().copied().collect())
    }

    fn emit_set(
        &mut self,
        text: &ContinuedLines,
        piece: Piece<'_>,
        kind: TokenKind,
        modifiers: BTreeSet<TokenModifier>,
    ) -> bool {
        let position = text.position_of(piece.offset);
        self.tokens.record(Token::with_modifiers(
            position.line,
            position.column,
            piece.text.len(),
            kind,
            modifiers,
        ))
    }

    /// Declaration token for a name pass 1 registered, looked up in `method`
    /// scope first; unregistered names (rejected by pass 1) get none
    fn emit_declaration(&mut self, text: &ContinuedLines, piece: Piece<'_>, method: Option<&str>) {
        let symbols = self.symbols;
        if let Some(symbol) = symbols.lookup(method, piece.text) {
            self.emit_set(text, piece, symbol.kind.token_kind(), symbol.declaration_modifiers());
        }
    }

    fn error(&mut self, text: &ContinuedLines, piece: Piece<'_>, code: Code, message: String) {
        let position = text.position_of(piece.offset);
        self.diagnostics
            .error(position.line, position.column, piece.text.len(), code, message);
    }

    fn information(&mut self, text: &ContinuedLines, piece: Piece<'_>, code: Code, message: String) {
        let position = text.position_of(piece.offset);
        self.diagnostics
            .information(position.line, position.column, piece.text.len(), code, message);
    }

    /// Public symbols of the object behind `import`, resolved once per instance
    fn public_table(&mut self, import: &ObjectImport) -> Option<Arc<PublicSymbolTable>> {
        let key = import.instance.to_ascii_lowercase();
        if let Some(cached) = self.namespace_cache.get(&key) {
            return cached.clone();
        }
        let table = self
            .context
            .collaborators
            .namespaces
            .resolve_namespace(&import.instance, &import.filename);
        if table.is_none() {
            self.context
                .logger
                .trace(|| format!("namespace {} ({}) unresolved", import.instance, import.filename));
        }
        self.namespace_cache.insert(key, table.clone());
        table
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AnalyzerPreferences;
    use crate::declarations::scan;
    use crate::diagnostics::Diagnostic;
    use crate::logging::LoggingService;
    use crate::pipeline::{AllLinesEnabled, Collaborators, DisabledLines, MapNamespaces, NoFileSystem};

    pub(crate) struct Resolved {
        pub tokens: Vec<Token>,
        pub diagnostics: Vec<Diagnostic>,
    }

    impl Resolved {
        /// Token starting at `(line, column)`
        pub fn at(&self, line: usize, column: usize) -> Option<&Token> {
            self.tokens
                .iter()
                .find(|t| t.line == line && t.start_column == column)
        }

        /// First token covering the first occurrence of `needle` on `line`
        pub fn find(&self, source: &str, line: usize, needle: &str) -> Option<&Token> {
            let text = source.lines().nth(line)?;
            let column = text.find(needle)?;
            self.at(line, column)
        }

        pub fn messages(&self) -> Vec<&str> {
            self.diagnostics.iter().map(|d| d.message.as_str()).collect()
        }
    }

    pub(crate) fn resolve_full(
        source: &str,
        preferences: &AnalyzerPreferences,
        namespaces: &MapNamespaces,
        filter: &dyn crate::pipeline::LineFilter,
    ) -> Resolved {
        let lines: Vec<String> = source.lines().map(str::to_string).collect();
        let logger = LoggingService::disabled();
        let context = AnalysisContext {
            collaborators: Collaborators::new(&NoFileSystem, namespaces, filter),
            directory: ".",
            preferences,
            logger: &logger,
        };
        let mut diagnostics = DiagnosticCollector::new();
        let declarations = scan(&lines, &context, &mut diagnostics);
        let tokens = resolve(&lines, &declarations, &context, &mut diagnostics);
        Resolved {
            tokens: tokens.into_sorted(),
            diagnostics: diagnostics.finish(usize::MAX),
        }
    }

    pub(crate) fn resolve_source(source: &str) -> Resolved {
        resolve_full(
            source,
            &AnalyzerPreferences::default(),
            &MapNamespaces::new(),
            &AllLinesEnabled,
        )
    }

    #[test]
    fn test_section_keywords_and_comments() {
        let source = "CON ' settings\n  X = 1\n{{ doc }}\nPUB main()\n";
        let resolved = resolve_source(source);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        assert_eq!(resolved.at(0, 0).unwrap().kind, TokenKind::Keyword);
        let comment = resolved.at(0, 4).unwrap();
        assert_eq!(comment.kind, TokenKind::Comment);
        let doc = resolved.at(2, 0).unwrap();
        assert_eq!(doc.kind, TokenKind::Comment);
        assert!(doc.has_modifier(TokenModifier::Documentation));
        assert_eq!(resolved.at(3, 0).unwrap().kind, TokenKind::Keyword);
    }

    #[test]
    fn test_disabled_lines_become_one_comment() {
        let source = "CON\n  A = 1\n  B = MISSING\n";
        let filter = DisabledLines::new([2]);
        let resolved = resolve_full(
            source,
            &AnalyzerPreferences::default(),
            &MapNamespaces::new(),
            &filter,
        );
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        let on_line: Vec<&Token> = resolved.tokens.iter().filter(|t| t.line == 2).collect();
        assert_eq!(on_line.len(), 1);
        assert_eq!(on_line[0].kind, TokenKind::Comment);
        assert!(on_line[0].has_modifier(TokenModifier::Disabled));
        assert_eq!(on_line[0].length, "  B = MISSING".len());
    }

    #[test]
    fn test_preprocessor_directives() {
        let source = "#define FAST\nCON\n  X = 1\n";
        let resolved = resolve_source(source);
        assert_eq!(
            resolved.messages(),
            vec!["P2 Spin - PreProcessor Directive [#define] not supported!"]
        );
        assert!(resolved.at(0, 0).unwrap().has_modifier(TokenModifier::IllegalUse));

        let preferences = AnalyzerPreferences {
            highlight_flexspin_directives: true,
            ..AnalyzerPreferences::default()
        };
        let resolved = resolve_full(source, &preferences, &MapNamespaces::new(), &AllLinesEnabled);
        assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
        assert_eq!(resolved.at(0, 0).unwrap().kind, TokenKind::Directive);
        let name = resolved.at(0, 8).unwrap();
        assert_eq!(name.kind, TokenKind::Variable);
        assert!(name.has_modifier(TokenModifier::Declaration));
    }
}
