use crate::declarations::Declarations;
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::findings::{BlockSpan, CommentSpan, DebugDisplay, MethodSpan, PasmSpan};
use crate::symbols::{ObjectImport, PublicSymbolTable};
use crate::tokens::Token;
use crate::utils::{Position, SourceLines, Span};
use serde::Serialize;
use std::fmt;

/// Everything one `analyze` run produces. Columns are character columns.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub block_spans: Vec<BlockSpan>,
    pub method_spans: Vec<MethodSpan>,
    pub pasm_spans: Vec<PasmSpan>,
    pub comment_spans: Vec<CommentSpan>,
    pub debug_displays: Vec<DebugDisplay>,
    pub object_imports: Vec<ObjectImport>,
    pub public_symbols: PublicSymbolTable,
    /// `{Spin2_v##}` version, 0 when absent
    pub version: u32,
}

impl AnalysisResult {
    /// Assemble the result, moving token and diagnostic columns from bytes to characters
    pub(crate) fn new(
        source: &SourceLines,
        tokens: Vec<Token>,
        diagnostics: Vec<Diagnostic>,
        declarations: Declarations,
    ) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|mut token| {
                token.length = source.char_length(token.line, token.start_column, token.length);
                token.start_column = source.char_column(token.line, token.start_column);
                token
            })
            .collect();

        let diagnostics = diagnostics
            .into_iter()
            .map(|mut diagnostic| {
                diagnostic.span = char_span(source, diagnostic.span);
                diagnostic
            })
            .collect();

        let Declarations {
            symbols,
            findings,
            version,
        } = declarations;
        let object_imports = symbols
            .namespaces()
            .map(|import| {
                let mut import = import.clone();
                import.column = source.char_column(import.line, import.column);
                import
            })
            .collect();

        Self {
            tokens,
            diagnostics,
            block_spans: findings.blocks().to_vec(),
            method_spans: findings.methods().to_vec(),
            pasm_spans: findings.pasm_spans().to_vec(),
            comment_spans: findings.comments().to_vec(),
            debug_displays: findings.debug_displays().to_vec(),
            object_imports,
            public_symbols: symbols.public_table(),
            version,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn summary(&self) -> AnalysisSummary {
        let count = |severity: DiagnosticSeverity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        AnalysisSummary {
            tokens: self.tokens.len(),
            errors: count(DiagnosticSeverity::Error),
            warnings: count(DiagnosticSeverity::Warning),
            information: count(DiagnosticSeverity::Information) + count(DiagnosticSeverity::Hint),
            blocks: self.block_spans.len(),
            methods: self.method_spans.len(),
            object_imports: self.object_imports.len(),
        }
    }
}

fn char_span(source: &SourceLines, span: Span) -> Span {
    Span {
        start: Position::new(span.start.line, source.char_column(span.start.line, span.start.column)),
        end: Position::new(span.end.line, source.char_column(span.end.line, span.end.column)),
    }
}

/// Counts for logs and CLI summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub tokens: usize,
    pub errors: usize,
    pub warnings: usize,
    pub information: usize,
    pub blocks: usize,
    pub methods: usize,
    pub object_imports: usize,
}

impl fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tokens, {} errors, {} warnings, {} blocks, {} methods, {} objects",
            self.tokens, self.errors, self.warnings, self.blocks, self.methods, self.object_imports
        )
    }
}
