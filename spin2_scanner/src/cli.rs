//! Command line arguments and the settings they produce

use clap::{Parser, ValueEnum};
use spin2_analyzer::config::compile_time::batch_processing::MAX_WORKER_THREADS;
use spin2_analyzer::config::{ConfigError, LogLevel, RuntimeConfig};
use spin2_analyzer::BatchConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Semantic scanner for Spin2/PASM2 sources
#[derive(Debug, Parser)]
#[command(name = "spin2-scan")]
#[command(version)]
#[command(about = "Report semantic diagnostics for Spin2 and PASM2 files", long_about = None)]
pub struct Cli {
    /// A .spin2 file or a directory to scan
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Worker threads for directory scans
    #[arg(long)]
    pub threads: Option<usize>,

    /// Only scan the top level of a directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Stop a directory scan at the first failing file
    #[arg(long)]
    pub fail_fast: bool,

    /// TOML runtime configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Accept flexspin preprocessor directives
    #[arg(long)]
    pub flexspin: bool,

    /// Cap on diagnostics per file
    #[arg(long)]
    pub max_diagnostics: Option<usize>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Runtime configuration from `--config` (or defaults) with flags applied on top
    pub fn runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RuntimeConfig::from_file(path)?,
            None => {
                let mut config = RuntimeConfig::default();
                config.batch.max_threads = num_cpus::get();
                config
            }
        };

        if self.flexspin {
            config.analyzer.highlight_flexspin_directives = true;
        }
        if let Some(max) = self.max_diagnostics {
            config.analyzer.max_diagnostics = max;
        }
        if let Some(threads) = self.threads {
            config.batch.max_threads = threads;
        }
        config.batch.max_threads = config.batch.max_threads.clamp(1, MAX_WORKER_THREADS);
        if self.no_recursive {
            config.batch.recursive = false;
        }
        if self.fail_fast {
            config.batch.fail_fast = true;
        }
        config.logging.min_log_level = self.log_level();
        Ok(config)
    }

    pub fn batch_config(&self, config: &RuntimeConfig) -> BatchConfig {
        BatchConfig {
            progress_reporting: self.verbose > 0,
            ..BatchConfig::from(&config.batch)
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self.verbose {
            0 => LogLevel::Warning,
            1 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// `RUST_LOG` wins over `-v`
    pub fn init_env_logger(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_filter());
        env_logger::Builder::from_env(env)
            .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
            .format_module_path(self.verbose > 1)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "spin2-scan",
            "src",
            "--format",
            "json",
            "--threads",
            "3",
            "--no-recursive",
            "--flexspin",
            "--max-diagnostics",
            "10",
            "-vv",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.log_level(), LogLevel::Debug);

        let config = cli.runtime_config().unwrap();
        assert!(config.analyzer.highlight_flexspin_directives);
        assert_eq!(config.analyzer.max_diagnostics, 10);
        assert_eq!(config.batch.max_threads, 3.min(MAX_WORKER_THREADS));
        assert!(!config.batch.recursive);

        let batch = cli.batch_config(&config);
        assert!(!batch.recursive);
        assert!(batch.progress_reporting);
    }

    #[test]
    fn test_verbosity_reaches_logging_service() {
        use crate::bridge::LogBridge;
        use spin2_analyzer::logging::LoggingService;
        use std::sync::Arc;

        let cli = Cli::parse_from(["spin2-scan", "src", "-v"]);
        let config = cli.runtime_config().unwrap();
        let service = LoggingService::new(Arc::new(LogBridge), config.logging.min_log_level);
        assert_eq!(service.min_level(), LogLevel::Info);
    }

    #[test]
    fn test_threads_are_capped() {
        let cli = Cli::parse_from(["spin2-scan", "src", "--threads", "100000"]);
        let config = cli.runtime_config().unwrap();
        assert_eq!(config.batch.max_threads, MAX_WORKER_THREADS);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.log_level(), LogLevel::Warning);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spin2.toml");
        std::fs::write(&path, "[analyzer]\nmax_diagnostics = 7\n").unwrap();

        let cli = Cli::parse_from(["spin2-scan", "src", "--config", path.to_str().unwrap()]);
        let config = cli.runtime_config().unwrap();
        assert_eq!(config.analyzer.max_diagnostics, 7);
    }
}
