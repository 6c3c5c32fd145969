use crate::file_processor::FileProcessorError;
use crate::logging::Code;

/// Host-level failures; language problems are diagnostics, never errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(error) => error.error_code(),
        }
    }
}
