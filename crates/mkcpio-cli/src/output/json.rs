//! JSON output formatter for machine-readable results.
//!
//! The final report is printed pretty on stdout. Per-file diagnostics are
//! printed as one compact object per line on stderr.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use mkcpio_core::CreationReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Serialize)]
struct FileEvent {
    path: String,
    reason: String,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn diagnostic<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(io::stderr(), "{json}")?;
        Ok(())
    }

    fn file_event(path: &Path, reason: &str) -> FileEvent {
        FileEvent {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        #[derive(Serialize)]
        struct CreationOutput {
            output_path: String,
            files_added: usize,
            files_skipped: usize,
            entries_failed: usize,
            bytes_read: u64,
            bytes_written: u64,
            duration_ms: u128,
            skipped: Vec<FileEvent>,
            warnings: Vec<String>,
        }

        let data = CreationOutput {
            output_path: output_path.display().to_string(),
            files_added: report.files_added,
            files_skipped: report.files_skipped(),
            entries_failed: report.entries_failed,
            bytes_read: report.bytes_read,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
            skipped: report
                .skipped
                .iter()
                .map(|s| Self::file_event(&s.path, &s.reason))
                .collect(),
            warnings: report.warnings.clone(),
        };

        let output = JsonOutput::success("create", data);
        Self::output(&output)
    }

    fn format_added(&self, _path: &Path) {}

    fn format_skip(&self, path: &Path, reason: &str) {
        let output = JsonOutput::warning("skip", Self::file_event(path, reason));
        let _ = Self::diagnostic(&output);
    }

    fn format_abandon(&self, path: &Path, reason: &str) {
        let output = JsonOutput::warning("abandon", Self::file_event(path, reason));
        let _ = Self::diagnostic(&output);
    }

    fn format_truncated(&self, path: &Path, reason: &str) {
        let output = JsonOutput::warning("truncated", Self::file_event(path, reason));
        let _ = Self::diagnostic(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::warning(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::diagnostic(&output);
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("create", format!("{error:#}"));
        let _ = Self::diagnostic(&output);
    }
}
