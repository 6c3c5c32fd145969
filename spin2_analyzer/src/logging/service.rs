//! Logging service and sinks

use super::codes::Code;
use super::events::{LogEvent, LogLevel};
use crate::config::compile_time::logging::LOG_BUFFER_SIZE;
use crate::config::runtime::LoggingPreferences;
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Logging service: a level filter in front of one sink
#[derive(Clone)]
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from runtime preferences
    pub fn from_preferences(preferences: &LoggingPreferences) -> Self {
        let min_level = preferences.min_log_level;
        let logger: Arc<dyn Logger> = if preferences.use_structured_logging {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger)
        };
        Self::new(logger, min_level)
    }

    /// A service that drops everything
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullLogger), LogLevel::Error)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_success_with_context(
        &self,
        success_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        let mut event = LogEvent::success(success_code, message);
        for (key, value) in context {
            event = event.with_context(key, value);
        }
        self.log_event(event);
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    /// Debug trace; the message is only built when debug output is enabled
    pub fn trace<F>(&self, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.should_log(LogLevel::Debug) {
            self.logger.log(&LogEvent::debug(&message()));
        }
    }

    /// `trace` tagged with a code, for pass milestones
    pub fn trace_with_code<F>(&self, code: Code, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.should_log(LogLevel::Debug) {
            self.logger.log(&LogEvent::debug_with_code(code, &message()));
        }
    }
}

impl std::fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingService")
            .field("min_level", &self.min_level)
            .finish()
    }
}

/// Plain text logger; errors go to stderr
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", event.format()),
            _ => println!("{}", event.format()),
        }
    }
}

/// JSON-lines logger for tooling integration
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        let line = event.format_json().unwrap_or_else(|_| event.format());
        match event.level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }
}

/// Logger that discards every event
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Memory logger for testing
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn has_event_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.code == code)
    }

    pub fn messages_containing(&self, needle: &str) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.message.contains(needle))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEvent>> {
        // A poisoned buffer still holds valid events
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();

        if events.len() >= LOG_BUFFER_SIZE {
            let remove_count = events.len() - LOG_BUFFER_SIZE + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}
