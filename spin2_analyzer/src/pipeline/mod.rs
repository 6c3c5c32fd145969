//! Analysis entry points
//!
//! `analyze` runs pass 1 over the whole document, then pass 2 against the
//! finished symbol table. It is a pure function of the text and the three
//! read-only collaborators; the only logging it does goes through the
//! injected `LoggingService`.

mod collaborators;
mod error;
mod result;

pub use collaborators::*;
pub use error::PipelineError;
pub use result::{AnalysisResult, AnalysisSummary};

use crate::config::AnalyzerPreferences;
use crate::declarations::{self, AnalysisContext};
use crate::diagnostics::DiagnosticCollector;
use crate::logging::{self, codes, LoggingService};
use crate::reference_resolution;
use crate::utils::SourceLines;
use std::path::Path;
use std::time::Instant;

/// Analyze one document with default preferences
pub fn analyze(
    text: &str,
    source_dir: &str,
    collaborators: &Collaborators<'_>,
    logger: &LoggingService,
) -> AnalysisResult {
    analyze_with_preferences(
        text,
        source_dir,
        collaborators,
        logger,
        &AnalyzerPreferences::default(),
    )
}

pub fn analyze_with_preferences(
    text: &str,
    source_dir: &str,
    collaborators: &Collaborators<'_>,
    logger: &LoggingService,
    preferences: &AnalyzerPreferences,
) -> AnalysisResult {
    analyze_document(
        text,
        source_dir,
        collaborators,
        logger,
        preferences,
        DiagnosticCollector::new(),
    )
}

/// Both passes; `diagnostics` may already hold findings from the caller
/// (the workspace adds import graph problems) and is finished here.
pub(crate) fn analyze_document(
    text: &str,
    source_dir: &str,
    collaborators: &Collaborators<'_>,
    logger: &LoggingService,
    preferences: &AnalyzerPreferences,
    mut diagnostics: DiagnosticCollector,
) -> AnalysisResult {
    let source = SourceLines::new(text);
    let context = AnalysisContext {
        collaborators: *collaborators,
        directory: source_dir,
        preferences,
        logger,
    };

    let declarations = declarations::scan(source.as_slice(), &context, &mut diagnostics);
    logger.trace_with_code(codes::success::DECLARATION_SCAN_COMPLETE, || {
        format!("pass 1: {} diagnostics", diagnostics.len())
    });
    let tokens = reference_resolution::resolve(source.as_slice(), &declarations, &context, &mut diagnostics);
    logger.trace_with_code(codes::success::REFERENCE_RESOLUTION_COMPLETE, || {
        format!("pass 2: {} tokens, {} diagnostics", tokens.len(), diagnostics.len())
    });

    let diagnostics = diagnostics.finish(preferences.max_diagnostics);
    AnalysisResult::new(&source, tokens.into_sorted(), diagnostics, declarations)
}

/// Read a file from disk and analyze it; OBJ and FILE names are checked
/// against its directory. Object namespaces are not followed (see `Workspace`).
pub fn process_file(
    file_path: &Path,
    preferences: &AnalyzerPreferences,
) -> Result<AnalysisResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(file_path.to_path_buf(), 0, || {
        let file_result = crate::file_processor::process_file(file_path)?;
        let directory = file_result.metadata.directory();

        let disabled = LoggingService::disabled();
        let logger = logging::try_get_global_logger().unwrap_or(&disabled);
        let collaborators = Collaborators::new(&StdFileSystem, &NoNamespaces, &AllLinesEnabled);
        let result = analyze_with_preferences(
            &file_result.source,
            &directory.to_string_lossy(),
            &collaborators,
            logger,
            preferences,
        );

        let summary = result.summary();
        crate::log_success!(
            codes::success::ANALYSIS_COMPLETE,
            "Spin2 analysis completed",
            "tokens" => summary.tokens,
            "errors" => summary.errors,
            "duration_ms" => format!("{:.2}", start_time.elapsed().as_secs_f64() * 1000.0)
        );
        Ok(result)
    })
}
