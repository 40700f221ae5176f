//! Archive creation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// An input that produced no entry, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path as given on input.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Report of one archive creation run.
///
/// # Examples
///
/// ```
/// use mkcpio_core::CreationReport;
///
/// let mut report = CreationReport::new();
/// report.files_added = 2;
/// report.add_skipped("missing.elf", "couldn't open");
///
/// assert_eq!(report.files_skipped(), 1);
/// assert_eq!(report.inputs_seen(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Entries written to the archive.
    pub files_added: usize,

    /// Inputs rejected by the skip policy or by the encoder.
    pub skipped: Vec<SkippedFile>,

    /// Entries whose record was written but whose content did not match the
    /// declared size.
    pub entries_failed: usize,

    /// Content bytes copied from input files.
    pub bytes_read: u64,

    /// Total archive size, trailer included.
    pub bytes_written: u64,

    /// Wall-clock duration of the run.
    pub duration: Duration,

    /// Non-fatal problems that may have left the archive malformed.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a skipped input.
    pub fn add_skipped(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Records a warning.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Number of inputs that produced no entry.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Whether any warnings were recorded.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Every input accounted for: added, skipped, or failed.
    #[must_use]
    pub fn inputs_seen(&self) -> usize {
        self.files_added + self.files_skipped() + self.entries_failed
    }

    /// Whether every input became a clean entry.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.entries_failed == 0 && self.warnings.is_empty()
    }
}
