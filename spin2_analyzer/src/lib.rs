// Internal modules
pub mod batch;
pub mod builtins;
pub mod config;
pub mod declarations;
pub mod diagnostics;
pub mod file_processor;
pub mod findings;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod reference_resolution;
pub mod symbols;
pub mod tokens;
pub mod utils;
pub mod workspace;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use pipeline::{analyze, analyze_with_preferences, AnalysisResult, Collaborators, PipelineError};
pub use tokens::{Token, TokenKind, TokenModifier};
pub use workspace::{DocumentAnalysis, Workspace, WorkspaceError};
