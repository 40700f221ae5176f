//! Create command implementation.

use crate::cli::Cli;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use mkcpio_core::ArchiveConfig;
use mkcpio_core::CpioError;
use mkcpio_core::ProgressCallback;
use mkcpio_core::create_archive_with_progress;
use std::path::Path;

pub fn execute(args: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut config = ArchiveConfig::default().with_follow_symlinks(!args.no_follow_symlinks);
    if let Some(size) = args.buffer_size {
        config = config.with_buffer_size(size);
    }

    let bar = (CliProgress::should_show() && !args.quiet && !args.json)
        .then(|| CliProgress::new(args.files.len(), "Archiving"));
    let mut sink = Diagnostics { formatter, bar };

    let report = add_archive_context(
        create_archive_with_progress(&args.output, &args.files, &config, &mut sink),
        &args.output,
    )?;
    drop(sink);

    formatter.format_creation_result(&args.output, &report)
}

/// Prints per-file outcomes as they happen, around an optional progress bar.
struct Diagnostics<'a> {
    formatter: &'a dyn OutputFormatter,
    bar: Option<CliProgress>,
}

impl Diagnostics<'_> {
    fn print<F: FnOnce(&dyn OutputFormatter)>(&self, f: F) {
        let formatter = self.formatter;
        match &self.bar {
            Some(bar) => bar.suspend(|| f(formatter)),
            None => f(formatter),
        }
    }

    fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc();
        }
    }
}

impl ProgressCallback for Diagnostics<'_> {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, bytes: u64) {
        if let Some(bar) = &mut self.bar {
            bar.add_bytes(bytes);
        }
    }

    fn on_entry_complete(&mut self, path: &Path) {
        self.print(|f| f.format_added(path));
        self.advance();
    }

    fn on_entry_skipped(&mut self, path: &Path, reason: &str) {
        self.print(|f| f.format_skip(path, reason));
        self.advance();
    }

    fn on_entry_failed(&mut self, path: &Path, error: &CpioError) {
        let reason = error.to_string();
        if error.is_content_failure() {
            self.print(|f| f.format_truncated(path, &reason));
        } else {
            self.print(|f| f.format_abandon(path, &reason));
        }
        self.advance();
    }

    fn on_warning(&mut self, path: &Path, message: &str) {
        let line = format!("finishing '{}': {message}", path.display());
        self.print(|f| f.format_warning(&line));
        self.advance();
    }

    fn on_complete(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}
