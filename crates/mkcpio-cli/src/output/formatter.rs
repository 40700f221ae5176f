//! Output formatter trait for CLI results.

use anyhow::Result;
use mkcpio_core::CreationReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
///
/// Results go to stdout; skips, warnings and errors go to stderr.
pub trait OutputFormatter {
    /// Format creation result
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()>;

    /// Report an entry that was written
    fn format_added(&self, path: &Path);

    /// Report an input that produced no entry
    fn format_skip(&self, path: &Path, reason: &str);

    /// Report an entry that was abandoned after it was accepted
    fn format_abandon(&self, path: &Path, reason: &str);

    /// Report an entry whose content does not match its declared size
    fn format_truncated(&self, path: &Path, reason: &str);

    /// Format warning message
    fn format_warning(&self, message: &str);

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn warning(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Warning,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
