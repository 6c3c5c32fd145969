//! Reading Spin2 sources from disk

mod processor;

use std::path::Path;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Read a file with default settings
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_api() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.spin2");
        std::fs::write(&path, "PUB main()\n").unwrap();
        assert!(process_file(&path).is_ok());
        assert_eq!(FileProcessor::max_file_size(), crate::config::compile_time::file_processing::MAX_FILE_SIZE);
    }
}
