//! Text and JSON rendering of scan results

use serde::Serialize;
use spin2_analyzer::pipeline::AnalysisSummary;
use spin2_analyzer::{AnalysisResult, BatchResults};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub summary: AnalysisSummary,
    pub result: AnalysisResult,
}

#[derive(Debug, Serialize)]
pub struct FailureReport {
    pub path: PathBuf,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub failures: Vec<FailureReport>,
    pub duration_ms: u128,
}

impl ScanReport {
    pub fn add_file(&mut self, path: PathBuf, result: AnalysisResult) {
        self.files.push(FileReport {
            path,
            summary: result.summary(),
            result,
        });
    }

    pub fn add_failure(&mut self, path: PathBuf, code: impl ToString, message: impl ToString) {
        self.failures.push(FailureReport {
            path,
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    pub fn from_batch(results: BatchResults) -> Self {
        let mut report = ScanReport {
            duration_ms: results.processing_duration.as_millis(),
            ..ScanReport::default()
        };
        for (path, result) in results.successful_files {
            report.add_file(path, result);
        }
        for (path, error) in results.failed_files {
            report.add_failure(path, error.error_code(), &error);
        }
        report
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis();
    }

    pub fn error_count(&self) -> usize {
        self.files.iter().map(|f| f.summary.errors).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|f| f.summary.warnings).sum()
    }

    /// Exit status 1 when anything failed
    pub fn failed(&self) -> bool {
        !self.failures.is_empty() || self.error_count() > 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            for diagnostic in &file.result.diagnostics {
                let _ = writeln!(out, "{}:{}", display_path(&file.path), diagnostic);
            }
        }
        for failure in &self.failures {
            let _ = writeln!(
                out,
                "{}: error: {} [{}]",
                display_path(&failure.path),
                failure.message,
                failure.code
            );
        }
        let _ = writeln!(
            out,
            "Scanned {} files: {} errors, {} warnings, {} failed ({} ms)",
            self.files.len() + self.failures.len(),
            self.error_count(),
            self.warning_count(),
            self.failures.len(),
            self.duration_ms
        );
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin2_analyzer::logging::LoggingService;
    use spin2_analyzer::pipeline::{AllLinesEnabled, NoFileSystem, NoNamespaces};
    use spin2_analyzer::{analyze, Collaborators};

    fn result(text: &str) -> AnalysisResult {
        let collaborators = Collaborators::new(&NoFileSystem, &NoNamespaces, &AllLinesEnabled);
        analyze(text, ".", &collaborators, &LoggingService::disabled())
    }

    #[test]
    fn test_text_lines_point_at_diagnostics() {
        let mut report = ScanReport::default();
        report.add_file(PathBuf::from("top.spin2"), result("PUB main() : r\n  r := missing\n"));
        report.add_failure(PathBuf::from("gone.spin2"), "E005", "File not found");

        let text = report.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("top.spin2:2:8: error: Missing Declaration [missing]"));
        assert!(lines.contains(&"gone.spin2: error: File not found [E005]"));
        assert!(lines.last().unwrap().starts_with("Scanned 2 files: 1 errors"));
        assert!(report.failed());
    }

    #[test]
    fn test_json_output() {
        let mut report = ScanReport::default();
        report.add_file(PathBuf::from("ok.spin2"), result("PUB main()\n"));
        assert!(!report.failed());

        let json: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();
        assert_eq!(json["files"][0]["path"], "ok.spin2");
        assert_eq!(json["files"][0]["summary"]["errors"], 0);
        assert!(json["failures"].as_array().unwrap().is_empty());
    }
}
