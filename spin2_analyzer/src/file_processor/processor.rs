//! Spin2 source reader with compile-time limits and global logging

use crate::config::compile_time::file_processing::{MAX_FILE_SIZE, MAX_LINE_COUNT};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const UTF8_BOM: &str = "\u{feff}";

/// File processor specific errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: expected .spin2, found {extension:?}")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty")]
    EmptyFile,

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::EmptyFile => codes::file_processing::EMPTY_FILE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::TooManyLines { .. } => codes::file_processing::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    /// Size in bytes as stored on disk, BOM included
    pub size: u64,
    pub extension: Option<String>,
    pub line_count: usize,
    pub is_spin2_file: bool,
    /// The file started with a UTF-8 byte order mark
    pub had_bom: bool,
}

impl FileMetadata {
    /// Directory the file lives in; OBJ and FILE names resolve against it
    pub fn directory(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Source text plus metadata
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    /// Decoded text with any BOM removed
    pub source: String,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    pub fn char_count(&self) -> usize {
        self.source.chars().count()
    }
}

/// Reads `.spin2` sources within the compile-time size and line limits
#[derive(Debug, Clone)]
pub struct FileProcessor {
    pub require_spin2_extension: bool,
    pub enable_performance_logging: bool,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            require_spin2_extension: false,
            enable_performance_logging: false,
        }
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_spin2_extension: prefs.require_spin2_extension,
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_spin2_extension_required(mut self, required: bool) -> Self {
        self.require_spin2_extension = required;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    pub fn process_file(&self, file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();
        let display_path = file_path.display().to_string();
        log_debug!("Starting file processing", "file" => display_path);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_file(&metadata, &display_path)?;

        let bytes = fs::read(&path).map_err(|e| {
            let error = FileProcessorError::from_io(&path, e);
            log_error!(error.error_code(), "Failed to read file", "file" => display_path);
            error
        })?;
        let text = String::from_utf8(bytes).map_err(|_| {
            let error = FileProcessorError::InvalidEncoding {
                path: display_path.clone(),
            };
            log_error!(error.error_code(), "File is not valid UTF-8", "file" => display_path);
            error
        })?;

        let (source, had_bom) = match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => (stripped.to_string(), true),
            None => (text, false),
        };

        let line_count = source.lines().count();
        if line_count > MAX_LINE_COUNT {
            let error = FileProcessorError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(error.error_code(), "File exceeds maximum line count",
                "file" => display_path,
                "lines" => line_count,
                "max_lines" => MAX_LINE_COUNT);
            return Err(error);
        }
        metadata.line_count = line_count;
        metadata.had_bom = had_bom;

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };
        self.log_processing_success(&result, &display_path);
        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        let duration_ms = format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0);
        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "chars" => result.char_count(),
                "bom" => result.metadata.had_bom,
                "duration_ms" => duration_ms
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "lines" => result.metadata.line_count,
                "duration_ms" => duration_ms
            );
        }
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        let display_path = file_path.display().to_string();
        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath { path: display_path };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }
        if !file_path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: display_path.clone(),
            };
            log_error!(error.error_code(), "File not found", "path" => display_path);
            return Err(error);
        }
        if !file_path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: display_path.clone(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => display_path);
            return Err(error);
        }
        file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(file_path, e);
            log_error!(error.error_code(), "Failed to canonicalize path", "path" => display_path);
            error
        })
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, e);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display());
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let is_spin2_file = extension.as_deref() == Some("spin2");

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_spin2_file,
            had_bom: false,
        })
    }

    fn validate_file(&self, metadata: &FileMetadata, file_path: &str) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }
        if metadata.size == 0 {
            let error = FileProcessorError::EmptyFile;
            log_error!(error.error_code(), "File is empty", "file" => file_path);
            return Err(error);
        }
        if self.require_spin2_extension && !metadata.is_spin2_file {
            let error = FileProcessorError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "File does not have .spin2 extension",
                "file" => file_path);
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_source_and_metadata() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blink.spin2");
        fs::write(&path, "CON\n  PIN = 56\nPUB main()\n").unwrap();

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert_eq!(result.metadata.line_count, 3);
        assert!(result.metadata.is_spin2_file);
        assert!(!result.metadata.had_bom);
        assert_eq!(result.metadata.directory(), dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_bom_is_removed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.spin2");
        fs::write(&path, "\u{feff}CON X = 1\n").unwrap();

        let result = FileProcessor::new().process_file(&path).unwrap();
        assert!(result.source.starts_with("CON"));
        assert!(result.metadata.had_bom);
        assert_eq!(result.metadata.size, 13);
        assert_eq!(result.char_count(), 10);
    }

    #[test]
    fn test_rejected_files() {
        let dir = tempdir().unwrap();

        let missing = FileProcessor::new().process_file(&dir.path().join("absent.spin2"));
        assert_matches!(missing, Err(FileProcessorError::FileNotFound { .. }));

        let empty = dir.path().join("empty.spin2");
        fs::write(&empty, "").unwrap();
        assert_matches!(
            FileProcessor::new().process_file(&empty),
            Err(FileProcessorError::EmptyFile)
        );

        let binary = dir.path().join("binary.spin2");
        fs::write(&binary, [0xff, 0xfe, 0x00, 0x43]).unwrap();
        assert_matches!(
            FileProcessor::new().process_file(&binary),
            Err(FileProcessorError::InvalidEncoding { .. })
        );

        let text = dir.path().join("notes.txt");
        fs::write(&text, "CON X = 1\n").unwrap();
        let strict = FileProcessor::new().with_spin2_extension_required(true);
        assert_matches!(
            strict.process_file(&text),
            Err(FileProcessorError::InvalidExtension { extension: Some(ref ext) }) if ext == "txt"
        );

        assert_matches!(
            FileProcessor::new().process_file(dir.path()),
            Err(FileProcessorError::InvalidPath { .. })
        );
    }

    #[test]
    fn test_error_codes() {
        let error = FileProcessorError::FileNotFound {
            path: "a.spin2".to_string(),
        };
        assert_eq!(error.error_code(), codes::file_processing::FILE_NOT_FOUND);
        let error = FileProcessorError::TooManyLines {
            lines: 10,
            max_lines: 5,
        };
        assert_eq!(error.error_code(), codes::file_processing::TOO_MANY_LINES);
    }
}
