//! Directory batch analysis
//!
//! Files are split across worker threads. Every thread owns a `Workspace`
//! rooted at the scanned directory, so objects imported by several files in
//! the same thread are analyzed once and nothing mutable crosses threads.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::{AnalyzerPreferences, BatchPreferences};
use crate::logging::{self, codes, Code, LoggingService};
use crate::pipeline::AnalysisResult;
use crate::workspace::{Workspace, WorkspaceError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: true,
            fail_fast: false,
        }
    }
}

impl From<&BatchPreferences> for BatchConfig {
    fn from(preferences: &BatchPreferences) -> Self {
        Self {
            max_threads: preferences.max_threads,
            recursive: preferences.recursive,
            max_files: None,
            progress_reporting: preferences.progress_reporting,
            fail_fast: preferences.fail_fast,
        }
    }
}

impl BatchConfig {
    fn worker_count(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    fn file_limit(&self) -> usize {
        self.max_files
            .map_or(MAX_FILES_PER_BATCH, |limit| limit.min(MAX_FILES_PER_BATCH))
    }
}

#[derive(Debug)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, AnalysisResult)>,
    pub failed_files: Vec<(PathBuf, WorkspaceError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self {
            successful_files: Vec::new(),
            failed_files: Vec::new(),
            processing_duration: Duration::new(0, 0),
            files_processed: 0,
            files_discovered: 0,
        }
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    /// Error diagnostics across every analyzed file
    pub fn error_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.errors().count())
            .sum()
    }

    /// True when some file failed to load or produced an error diagnostic
    pub fn has_errors(&self) -> bool {
        !self.failed_files.is_empty() || self.successful_files.iter().any(|(_, r)| r.has_errors())
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: AnalysisResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: WorkspaceError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    /// Restore discovery order after threads finish out of order
    fn sort(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Analyzed {} of {} files: {} succeeded ({:.1}%), {} failed, {} error diagnostics, {:.2}s total",
            self.files_processed,
            self.files_discovered,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.error_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

impl Default for BatchResults {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No .spin2 files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_FILES_FOUND,
            BatchError::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            BatchError::IoError { .. } => codes::file_processing::IO_ERROR,
            BatchError::ThreadError { .. } => codes::batch::THREAD_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Find `.spin2` files under `dir_path`, sorted
pub fn discover_spin2_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        });
    }

    let walker = WalkDir::new(dir_path)
        .follow_links(true)
        .max_depth(if config.recursive { usize::MAX } else { 1 });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| BatchError::IoError {
            error: e.to_string(),
        })?;
        if entry.file_type().is_file() && is_spin2_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        });
    }

    let limit = config.file_limit();
    if files.len() > limit {
        return Err(BatchError::TooManyFiles {
            count: files.len(),
            max: limit,
        });
    }

    files.sort();

    crate::log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

pub fn is_spin2_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("spin2"))
}

// ============================================================================
// PROCESSING
// ============================================================================

/// Analyze every `.spin2` file under `dir_path` with default analyzer settings
pub fn process_directory(dir_path: &Path, config: &BatchConfig) -> Result<BatchResults, BatchError> {
    process_directory_with_preferences(dir_path, config, &AnalyzerPreferences::default())
}

pub fn process_directory_with_preferences(
    dir_path: &Path,
    config: &BatchConfig,
    preferences: &AnalyzerPreferences,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let files = discover_spin2_files(dir_path, config)?;
    let discovered = files.len();

    let threads = config.worker_count().min(discovered);
    let per_thread = discovered.div_ceil(threads);

    crate::log_info!("Starting batch analysis",
        "total_files" => discovered,
        "threads" => threads,
        "files_per_thread" => per_thread
    );

    let stop = Arc::new(AtomicBool::new(false));
    let logger = logging::try_get_global_logger()
        .cloned()
        .unwrap_or_else(LoggingService::disabled);

    let mut handles = Vec::with_capacity(threads);
    for (thread_id, chunk) in files.chunks(per_thread).enumerate() {
        let worker = Worker {
            root: dir_path.to_path_buf(),
            files: chunk.to_vec(),
            first_file_id: thread_id * per_thread,
            preferences: preferences.clone(),
            logger: logger.clone(),
            config: config.clone(),
            stop: Arc::clone(&stop),
        };
        let handle = thread::Builder::new()
            .name(format!("spin2-batch-{}", thread_id))
            .spawn(move || worker.run())
            .map_err(|e| BatchError::ThreadError {
                message: e.to_string(),
            })?;
        handles.push(handle);
    }

    let mut results = BatchResults::new();
    for handle in handles {
        let partial = handle.join().map_err(|_| BatchError::ThreadError {
            message: "Worker thread panicked during analysis".to_string(),
        })?;
        results.merge(partial);
    }

    results.sort();
    results.files_discovered = discovered;
    results.processing_duration = start_time.elapsed();

    if config.fail_fast && stop.load(Ordering::Relaxed) {
        crate::log_warning!("Fail-fast mode enabled, batch analysis stopped early",
            "processed" => results.files_processed,
            "discovered" => discovered
        );
    }

    crate::log_success!(
        codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
        "Batch analysis completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

/// One thread's share of the batch
struct Worker {
    root: PathBuf,
    files: Vec<PathBuf>,
    first_file_id: usize,
    preferences: AnalyzerPreferences,
    logger: LoggingService,
    config: BatchConfig,
    stop: Arc<AtomicBool>,
}

impl Worker {
    fn run(self) -> BatchResults {
        let mut workspace = Workspace::new(&self.root)
            .with_preferences(self.preferences)
            .with_logger(self.logger);
        let mut results = BatchResults::new();

        for (offset, file_path) in self.files.into_iter().enumerate() {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            let file_id = self.first_file_id + offset;
            logging::with_file_context(file_path.clone(), file_id, || {
                match workspace.analyze_file(&file_path) {
                    Ok(document) => {
                        if self.config.progress_reporting {
                            crate::log_info!("Analyzed file",
                                "summary" => document.result.summary()
                            );
                        }
                        let failed = document.result.has_errors();
                        results.add_success(file_path.clone(), document.result.clone());
                        if failed && self.config.fail_fast {
                            self.stop.store(true, Ordering::Relaxed);
                        }
                    }
                    Err(error) => {
                        crate::log_error!(error.error_code(), &error.to_string());
                        results.add_failure(file_path.clone(), error);
                        if self.config.fail_fast {
                            self.stop.store(true, Ordering::Relaxed);
                        }
                    }
                }
            });
        }
        results
    }
}
