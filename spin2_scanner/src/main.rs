//! # spin2-scan
//!
//! Analyzes a `.spin2` file, or every `.spin2` file under a directory, and
//! prints the semantic diagnostics.

mod bridge;
mod cli;
mod report;

use bridge::LogBridge;
use clap::Parser;
use cli::{Cli, OutputFormat};
use report::ScanReport;
use spin2_analyzer::config::RuntimeConfig;
use spin2_analyzer::logging::{self, codes, LoggingService};
use spin2_analyzer::{batch, log_error, log_info, log_success, Workspace};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.init_env_logger();

    let config = match cli.runtime_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            std::process::exit(1);
        }
    };
    let service = LoggingService::new(Arc::new(LogBridge), config.logging.min_log_level);
    if let Err(message) = logging::init_global_logging_with_service(service.clone()) {
        eprintln!("error[{}]: {}", codes::system::INITIALIZATION_FAILURE, message);
        std::process::exit(1);
    }
    log_info!("spin2-scan starting", "path" => cli.path.display());

    let report = if cli.path.is_file() {
        scan_single_file(&cli.path, &config, service)
    } else if cli.path.is_dir() {
        scan_directory(&cli, &config)?
    } else {
        eprintln!("Error: Input must be a .spin2 file or a directory");
        eprintln!("  Path: {}", cli.path.display());
        std::process::exit(1);
    };

    match cli.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }

    if report.failed() {
        std::process::exit(1);
    }
    Ok(())
}

fn scan_single_file(path: &Path, config: &RuntimeConfig, service: LoggingService) -> ScanReport {
    let start = Instant::now();
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let mut workspace = Workspace::new(root)
        .with_preferences(config.analyzer.clone())
        .with_logger(service);

    let file_name = path.file_name().map(Path::new).unwrap_or(path);

    let mut report = ScanReport::default();
    logging::with_file_context(path.to_path_buf(), 0, || match workspace.analyze_file(file_name) {
        Ok(document) => {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File scanned",
                "summary" => document.result.summary()
            );
            report.add_file(path.to_path_buf(), document.result.clone());
        }
        Err(error) => {
            log_error!(error.error_code(), "File scan failed", "error" => &error);
            report.add_failure(path.to_path_buf(), error.error_code(), &error);
        }
    });
    report.set_duration(start.elapsed());
    report
}

fn scan_directory(cli: &Cli, config: &RuntimeConfig) -> Result<ScanReport, batch::BatchError> {
    let batch_config = cli.batch_config(config);
    let results = batch::process_directory_with_preferences(&cli.path, &batch_config, &config.analyzer)
        .inspect_err(|error| log_error!(error.error_code(), &error.to_string()))?;

    log_info!("Directory scan finished", "summary" => results.summary());
    Ok(ScanReport::from_batch(results))
}
