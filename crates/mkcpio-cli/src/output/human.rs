//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use mkcpio_core::CreationReport;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled_stderr(),
            term: Term::stdout(),
            err: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn skip_line(path: &Path, reason: &str) -> String {
        format!("skipping {}: {reason}", path.display())
    }

    fn abandon_line(path: &Path, reason: &str) -> String {
        format!("abandoning {}: {reason}", path.display())
    }

    fn truncated_line(path: &Path, reason: &str) -> String {
        format!("truncated {}: {reason}", path.display())
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_creation_result(&self, output_path: &Path, report: &CreationReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if console::colors_enabled() {
            let _ = self.term.write_line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                output_path.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Archive created: {}", output_path.display()));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        if report.files_skipped() > 0 {
            let _ = self.term.write_line(&format!(
                "  Files skipped:    {}",
                Self::format_number(report.files_skipped())
            ));
        }
        if report.entries_failed > 0 {
            let _ = self.term.write_line(&format!(
                "  Entries failed:   {}",
                Self::format_number(report.entries_failed)
            ));
        }
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Content read:     {}",
                Self::format_size(report.bytes_read)
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "  Warnings:         {} (archive may be malformed)",
                report.warnings.len()
            ));
        }

        Ok(())
    }

    fn format_added(&self, path: &Path) {
        if self.verbose {
            let _ = self.term.write_line(&format!("adding {}", path.display()));
        }
    }

    fn format_skip(&self, path: &Path, reason: &str) {
        if self.quiet {
            return;
        }

        let line = Self::skip_line(path, reason);
        if self.use_colors {
            let _ = self.err.write_line(&format!("{} {line}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&line);
        }
    }

    fn format_abandon(&self, path: &Path, reason: &str) {
        // Always show abandoned entries, even in quiet mode
        let line = Self::abandon_line(path, reason);
        if self.use_colors {
            let _ = self.err.write_line(&format!("{} {line}", style("✗").red().bold()));
        } else {
            let _ = self.err.write_line(&line);
        }
    }

    fn format_truncated(&self, path: &Path, reason: &str) {
        let line = Self::truncated_line(path, reason);
        if self.use_colors {
            let _ = self.err.write_line(&format!("{} {line}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(&line);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.err.write_line(message);
        }
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err
                .write_line(&format!("{} {error:?}", style("error:").red().bold()));
        } else {
            let _ = self.err.write_line(&format!("error: {error:?}"));
        }
    }
}
