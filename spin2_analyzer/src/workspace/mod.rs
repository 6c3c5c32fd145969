//! Multi-document analysis
//!
//! A document's OBJ children are analyzed before the document itself, so
//! every namespace lookup sees a complete public table. Results are cached
//! by canonical path. A stack of files currently being analyzed detects
//! import cycles; the importing OBJ line gets a diagnostic and the cyclic
//! namespace resolves to nothing.

use crate::config::compile_time::namespaces::MAX_OBJECT_NESTING_DEPTH;
use crate::config::AnalyzerPreferences;
use crate::declarations::{self, AnalysisContext};
use crate::diagnostics::DiagnosticCollector;
use crate::file_processor::{FileProcessor, FileProcessorError};
use crate::logging::{self, codes, Code, LoggingService};
use crate::pipeline::{
    self, AllLinesEnabled, AnalysisResult, Collaborators, MapNamespaces, NoFileSystem,
    NoNamespaces, StdFileSystem,
};
use crate::symbols::{ObjectImport, PublicSymbolTable};
use crate::utils::SourceLines;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: FileProcessorError,
    },

    #[error("Cyclic object reference [{chain}]")]
    CyclicImport { chain: String },
}

impl WorkspaceError {
    pub fn error_code(&self) -> Code {
        match self {
            WorkspaceError::File { source, .. } => source.error_code(),
            WorkspaceError::CyclicImport { .. } => codes::namespaces::CYCLIC_OBJECT_REFERENCE,
        }
    }
}

/// One analyzed file
#[derive(Debug)]
pub struct DocumentAnalysis {
    pub path: PathBuf,
    pub result: AnalysisResult,
    /// Shared with the documents that import this one
    pub public_symbols: Arc<PublicSymbolTable>,
}

/// `from` declares `instance : "to"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    pub from: PathBuf,
    pub to: PathBuf,
    pub instance: String,
}

pub struct Workspace {
    root: PathBuf,
    preferences: AnalyzerPreferences,
    logger: LoggingService,
    processor: FileProcessor,
    max_depth: usize,
    documents: HashMap<PathBuf, Arc<DocumentAnalysis>>,
    visiting: Vec<PathBuf>,
    edges: Vec<ImportEdge>,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            preferences: AnalyzerPreferences::default(),
            logger: LoggingService::disabled(),
            processor: FileProcessor::new(),
            max_depth: MAX_OBJECT_NESTING_DEPTH,
            documents: HashMap::new(),
            visiting: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: AnalyzerPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Logger handed to both analysis passes
    pub fn with_logger(mut self, logger: LoggingService) -> Self {
        self.logger = logger;
        self
    }

    /// Lower the nesting limit; it never exceeds the compile-time maximum
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.clamp(1, MAX_OBJECT_NESTING_DEPTH);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Analyze `path` (relative paths are taken from the root) and every
    /// object it imports
    pub fn analyze_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<DocumentAnalysis>, WorkspaceError> {
        let path = self.root.join(path.as_ref());
        if let Ok(canonical) = path.canonicalize() {
            if let Some(document) = self.documents.get(&canonical) {
                return Ok(Arc::clone(document));
            }
            if self.visiting.contains(&canonical) {
                return Err(WorkspaceError::CyclicImport {
                    chain: self.cycle_chain(&canonical),
                });
            }
        }
        self.analyze_document(&path)
    }

    /// Every cached document
    pub fn documents(&self) -> impl Iterator<Item = &Arc<DocumentAnalysis>> {
        self.documents.values()
    }

    pub fn document(&self, path: &Path) -> Option<&Arc<DocumentAnalysis>> {
        let canonical = path.canonicalize().ok()?;
        self.documents.get(&canonical)
    }

    /// Import edges discovered so far, in discovery order
    pub fn object_graph(&self) -> &[ImportEdge] {
        &self.edges
    }

    fn analyze_document(&mut self, path: &Path) -> Result<Arc<DocumentAnalysis>, WorkspaceError> {
        let file = self
            .processor
            .process_file(path)
            .map_err(|source| WorkspaceError::File {
                path: path.to_path_buf(),
                source,
            })?;
        let canonical = file.metadata.path.clone();
        let directory = file.metadata.directory();

        logging::with_file_context(canonical.clone(), self.documents.len(), || {
            let mut diagnostics = DiagnosticCollector::new();
            let mut namespaces = MapNamespaces::new();

            self.visiting.push(canonical.clone());
            for import in object_imports(&file.source) {
                self.resolve_import(&canonical, &directory, &import, &mut namespaces, &mut diagnostics);
            }
            self.visiting.pop();

            let collaborators = Collaborators::new(&StdFileSystem, &namespaces, &AllLinesEnabled);
            let result = pipeline::analyze_document(
                &file.source,
                &directory.to_string_lossy(),
                &collaborators,
                &self.logger,
                &self.preferences,
                diagnostics,
            );

            crate::log_success!(
                codes::success::WORKSPACE_ANALYSIS_COMPLETE,
                "Workspace document analyzed",
                "objects" => namespaces.len(),
                "diagnostics" => result.diagnostics.len()
            );

            let public_symbols = Arc::new(result.public_symbols.clone());
            let document = Arc::new(DocumentAnalysis {
                path: canonical.clone(),
                result,
                public_symbols,
            });
            self.documents.insert(canonical.clone(), Arc::clone(&document));
            Ok(document)
        })
    }

    fn resolve_import(
        &mut self,
        parent: &Path,
        directory: &Path,
        import: &ObjectImport,
        namespaces: &mut MapNamespaces,
        diagnostics: &mut DiagnosticCollector,
    ) {
        // missing or invalid files were already reported by pass 1
        let Ok(child) = directory.join(&import.filename).canonicalize() else {
            return;
        };
        if !child.is_file() {
            return;
        }
        self.edges.push(ImportEdge {
            from: parent.to_path_buf(),
            to: child.clone(),
            instance: import.instance.clone(),
        });

        if self.visiting.contains(&child) {
            let chain = self.cycle_chain(&child);
            crate::log_warning!("Cyclic object reference", "chain" => chain);
            diagnostics.error(
                import.line,
                import.column,
                import.instance.len(),
                codes::namespaces::CYCLIC_OBJECT_REFERENCE,
                format!("Cyclic object reference [{chain}]"),
            );
            return;
        }
        if self.visiting.len() >= self.max_depth {
            diagnostics.error(
                import.line,
                import.column,
                import.instance.len(),
                codes::namespaces::NESTING_TOO_DEEP,
                format!("Object nesting too deep [{}]", import.filename),
            );
            return;
        }

        match self.analyze_file(&child) {
            Ok(document) => {
                namespaces.insert_shared(&import.filename, Arc::clone(&document.public_symbols));
            }
            Err(error) => {
                crate::log_error!(error.error_code(), "Object could not be analyzed",
                    "object" => import.filename,
                    "error" => error);
            }
        }
    }

    /// `a.spin2 -> b.spin2 -> a.spin2` for a cycle closing on `target`
    fn cycle_chain(&self, target: &Path) -> String {
        let start = self
            .visiting
            .iter()
            .position(|path| path == target)
            .unwrap_or(0);
        self.visiting[start..]
            .iter()
            .map(PathBuf::as_path)
            .chain(std::iter::once(target))
            .map(display_name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// OBJ declarations of `text`, found by a pass-1-only scan
fn object_imports(text: &str) -> Vec<ObjectImport> {
    let source = SourceLines::new(text);
    let logger = LoggingService::disabled();
    let preferences = AnalyzerPreferences::default();
    let context = AnalysisContext {
        collaborators: Collaborators::new(&NoFileSystem, &NoNamespaces, &AllLinesEnabled),
        directory: ".",
        preferences: &preferences,
        logger: &logger,
    };
    let mut scratch = DiagnosticCollector::new();
    let declarations = declarations::scan(source.as_slice(), &context, &mut scratch);

    let mut seen = HashSet::new();
    declarations
        .symbols
        .namespaces()
        .filter(|import| seen.insert(import.filename.to_ascii_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    fn messages(document: &DocumentAnalysis) -> Vec<&str> {
        document
            .result
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect()
    }

    #[test]
    fn test_children_are_analyzed_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("top.spin2"),
            "OBJ\n  child : \"child\"\nPUB main() : r\n  r := child.SPEED + child.NOPE\n  child.go()\n",
        )
        .unwrap();
        fs::write(dir.path().join("child.spin2"), "CON\n  SPEED = 9\nPUB go()\n").unwrap();

        let mut workspace = Workspace::new(dir.path());
        let top = workspace.analyze_file("top.spin2").unwrap();
        assert_eq!(messages(&top), vec!["Object Constant [NOPE] not found in [child]"]);

        assert_eq!(workspace.documents().count(), 2);
        assert_eq!(workspace.object_graph().len(), 1);
        assert_eq!(workspace.object_graph()[0].instance, "child");

        let child = workspace.analyze_file("child.spin2").unwrap();
        let cached = workspace.document(&dir.path().join("child.spin2")).unwrap();
        assert!(Arc::ptr_eq(&child, cached));
        assert!(child.public_symbols.constant("SPEED").is_some());
    }

    #[test]
    fn test_cycle_is_reported_on_import_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.spin2"), "CON\n  X = 1\nOBJ\n  b : \"b\"\n").unwrap();
        fs::write(
            dir.path().join("b.spin2"),
            "OBJ\n  a : \"a\"\nPUB go() : r\n  r := a.X\n",
        )
        .unwrap();

        let mut workspace = Workspace::new(dir.path());
        let a = workspace.analyze_file("a.spin2").unwrap();
        assert!(a.result.diagnostics.is_empty(), "{:?}", a.result.diagnostics);

        let b = workspace.analyze_file("b.spin2").unwrap();
        assert_eq!(
            messages(&b),
            vec!["Cyclic object reference [a.spin2 -> b.spin2 -> a.spin2]"]
        );
        let diagnostic = &b.result.diagnostics[0];
        assert_eq!(diagnostic.code, codes::namespaces::CYCLIC_OBJECT_REFERENCE);
        assert_eq!((diagnostic.span.start.line, diagnostic.span.start.column), (1, 2));
    }

    #[test]
    fn test_self_import() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("me.spin2"), "OBJ\n  me : \"me\"\n").unwrap();

        let mut workspace = Workspace::new(dir.path());
        let me = workspace.analyze_file("me.spin2").unwrap();
        assert_eq!(messages(&me), vec!["Cyclic object reference [me.spin2 -> me.spin2]"]);
    }

    #[test]
    fn test_nesting_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.spin2"), "OBJ\n  b : \"b\"\n").unwrap();
        fs::write(dir.path().join("b.spin2"), "OBJ\n  c : \"c\"\n").unwrap();
        fs::write(dir.path().join("c.spin2"), "CON\n  Z = 0\n").unwrap();

        let mut workspace = Workspace::new(dir.path()).with_max_depth(2);
        workspace.analyze_file("a.spin2").unwrap();
        let b = workspace.document(&dir.path().join("b.spin2")).unwrap();
        assert_eq!(messages(b), vec!["Object nesting too deep [c.spin2]"]);
        assert!(workspace.document(&dir.path().join("c.spin2")).is_none());
    }

    #[test]
    fn test_missing_root_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut workspace = Workspace::new(dir.path());
        let result = workspace.analyze_file("absent.spin2");
        assert_matches!(
            result,
            Err(WorkspaceError::File {
                source: FileProcessorError::FileNotFound { .. },
                ..
            })
        );
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::file_processing::FILE_NOT_FOUND
        );
    }
}
