//! Logging for the analyzer and its hosts
//!
//! Two ways in:
//! - an explicit `LoggingService` handed to `pipeline::analyze`, used by the
//!   declaration and resolution passes;
//! - a process-wide service installed by `init_global_logging`, used through
//!   the `log_*!` macros by the file processor, workspace and batch layers.
//!
//! Events logged while a file is being processed carry that file in their
//! context (see `with_file_context`).

pub mod codes;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::OnceLock;

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, NullLogger, StructuredLogger};

use crate::config::runtime::LoggingPreferences;
use crate::utils::Span;

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<LoggingService> = OnceLock::new();

/// File currently being processed by this thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
}

thread_local! {
    static FILE_CONTEXT: RefCell<Option<FileProcessingContext>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize the global logging service from preferences
pub fn init_global_logging(preferences: &LoggingPreferences) -> Result<(), String> {
    let service = LoggingService::from_preferences(preferences);
    init_global_logging_with_service(service)?;

    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::success(
            codes::success::SYSTEM_INITIALIZATION_COMPLETED,
            "Global logging system initialized",
        ));
    }
    Ok(())
}

/// Initialize with a custom service (hosts with their own sink, tests)
pub fn init_global_logging_with_service(service: LoggingService) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get()
}

/// Whether debug events would reach the global sink
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// FILE CONTEXT MANAGEMENT
// ============================================================================

pub fn set_file_context(file_path: PathBuf, file_id: usize) {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(FileProcessingContext { file_path, file_id });
    });
}

pub fn clear_file_context() {
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = None;
    });
}

/// Execute function with file context, restoring the previous context afterwards
pub fn with_file_context<F, R>(file_path: PathBuf, file_id: usize, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = get_current_file_context();
    set_file_context(file_path, file_id);
    let result = f();
    FILE_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = previous;
    });
    result
}

pub fn get_current_file_context() -> Option<FileProcessingContext> {
    FILE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Build and route one event to the global service (used by the `log_*!` macros)
pub fn log_with_context(
    level: LogLevel,
    code: Code,
    message: &str,
    span: Option<Span>,
    context: Vec<(&str, &str)>,
) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(level) {
        return;
    }

    let mut event = match level {
        LogLevel::Error => LogEvent::error(code, message),
        LogLevel::Warning => LogEvent::warning_with_code(code, message),
        LogLevel::Info => LogEvent::success(code, message),
        LogLevel::Debug => LogEvent::debug(message),
    };

    if let Some(s) = span {
        event = event.with_span(s);
    }

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    if let Some(file_ctx) = get_current_file_context() {
        event = event.with_context("file", &file_ctx.file_path.display().to_string());
        event = event.with_context("file_id", &file_ctx.file_id.to_string());
    }

    logger.log_event(event);
}

/// Error logging that falls back to stderr when no service is installed
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_context_management() {
        let file_path = PathBuf::from("top.spin2");

        clear_file_context();
        assert!(get_current_file_context().is_none());

        set_file_context(file_path.clone(), 1);
        let context = get_current_file_context().unwrap();
        assert_eq!(context.file_path, file_path);
        assert_eq!(context.file_id, 1);

        clear_file_context();
        assert!(get_current_file_context().is_none());
    }

    #[test]
    fn test_with_file_context_restores_previous() {
        clear_file_context();
        set_file_context(PathBuf::from("outer.spin2"), 0);

        let result = with_file_context(PathBuf::from("inner.spin2"), 2, || {
            let context = get_current_file_context().unwrap();
            assert_eq!(context.file_path, PathBuf::from("inner.spin2"));
            42
        });

        assert_eq!(result, 42);
        assert_eq!(
            get_current_file_context().map(|c| c.file_path),
            Some(PathBuf::from("outer.spin2"))
        );
        clear_file_context();
    }

    #[test]
    fn test_macros_without_global_logger_do_not_panic() {
        crate::log_info!("no logger installed", "answer" => 42);
        crate::log_debug!("debug", "flag" => true);
        safe_log_error(codes::system::INTERNAL_ERROR, "fallback path");
    }
}
