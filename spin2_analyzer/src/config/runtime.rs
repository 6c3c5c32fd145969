// RUNTIME PREFERENCES (User Experience)

use super::compile_time;
pub use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> crate::logging::Code {
        crate::logging::codes::system::CONFIGURATION_ERROR
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject files without a .spin2 extension
    pub require_spin2_extension: bool,

    /// Whether to log size/line/duration metrics for each file
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_spin2_extension: env::var(env_vars::REQUIRE_SPIN2_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerPreferences {
    /// Treat flexspin preprocessor lines as directives instead of errors
    pub highlight_flexspin_directives: bool,

    /// Maximum diagnostics reported per document
    pub max_diagnostics: usize,

    /// Report locals that shadow a global of the same name
    pub report_hidden_globals: bool,
}

impl Default for AnalyzerPreferences {
    fn default() -> Self {
        Self {
            highlight_flexspin_directives: env::var(env_vars::ANALYZER_FLEXSPIN_DIRECTIVES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_diagnostics: env::var(env_vars::ANALYZER_MAX_DIAGNOSTICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(compile_time::diagnostics::MAX_DIAGNOSTICS),
            report_hidden_globals: env::var(env_vars::ANALYZER_REPORT_HIDDEN_GLOBALS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Minimum level that reaches the sink
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchPreferences {
    /// Worker threads used for directory scans
    pub max_threads: usize,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Stop at the first file that cannot be processed
    pub fail_fast: bool,

    /// Print a line per processed file
    pub progress_reporting: bool,
}

impl Default for BatchPreferences {
    fn default() -> Self {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            max_threads: env::var(env_vars::BATCH_MAX_THREADS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(available)
                .clamp(1, compile_time::batch_processing::MAX_WORKER_THREADS),
            recursive: env::var(env_vars::BATCH_RECURSIVE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            fail_fast: env::var(env_vars::BATCH_FAIL_FAST)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            progress_reporting: env::var(env_vars::BATCH_PROGRESS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub analyzer: AnalyzerPreferences,
    pub logging: LoggingPreferences,
    pub batch: BatchPreferences,
}

impl RuntimeConfig {
    /// Parse a configuration document; missing tables and keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.analyzer.max_diagnostics == 0 {
            return Err(ConfigError::InvalidValue {
                key: "analyzer.max_diagnostics".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.batch.max_threads == 0
            || self.batch.max_threads > compile_time::batch_processing::MAX_WORKER_THREADS
        {
            return Err(ConfigError::InvalidValue {
                key: "batch.max_threads".to_string(),
                message: format!(
                    "must be within 1..={}",
                    compile_time::batch_processing::MAX_WORKER_THREADS
                ),
            });
        }
        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_SPIN2_EXTENSION: &str = "SPIN2_REQUIRE_SPIN2_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "SPIN2_ENABLE_PERFORMANCE_LOGGING";

    // Analyzer
    pub const ANALYZER_FLEXSPIN_DIRECTIVES: &str = "SPIN2_ANALYZER_FLEXSPIN_DIRECTIVES";
    pub const ANALYZER_MAX_DIAGNOSTICS: &str = "SPIN2_ANALYZER_MAX_DIAGNOSTICS";
    pub const ANALYZER_REPORT_HIDDEN_GLOBALS: &str = "SPIN2_ANALYZER_REPORT_HIDDEN_GLOBALS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "SPIN2_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "SPIN2_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "SPIN2_LOGGING_INCLUDE_FILE_CONTEXT";

    // Batch
    pub const BATCH_MAX_THREADS: &str = "SPIN2_BATCH_MAX_THREADS";
    pub const BATCH_RECURSIVE: &str = "SPIN2_BATCH_RECURSIVE";
    pub const BATCH_FAIL_FAST: &str = "SPIN2_BATCH_FAIL_FAST";
    pub const BATCH_PROGRESS: &str = "SPIN2_BATCH_PROGRESS";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(env_vars::LOGGING_MIN_LEVEL.starts_with("SPIN2_"));
        assert!(env_vars::ANALYZER_FLEXSPIN_DIRECTIVES.starts_with("SPIN2_"));
        assert!(env_vars::BATCH_MAX_THREADS.starts_with("SPIN2_"));
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [analyzer]
            highlight_flexspin_directives = true
            max_diagnostics = 5

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.analyzer.highlight_flexspin_directives);
        assert_eq!(config.analyzer.max_diagnostics, 5);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.batch.max_threads >= 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = RuntimeConfig::from_toml_str("[analyzer]\nmax_diagnostics = 0\n");
        assert_matches!(result, Err(ConfigError::InvalidValue { .. }));

        let result = RuntimeConfig::from_toml_str("[analyzer\n");
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::from_file(&dir.path().join("absent.toml"));
        assert_matches!(result, Err(ConfigError::Read { .. }));
    }
}
