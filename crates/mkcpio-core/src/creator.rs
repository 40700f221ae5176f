//! Archive creation from a list of input files.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use crate::CpioError;
use crate::Result;
use crate::Severity;
use crate::config::ArchiveConfig;
use crate::encoder::EntryEncoder;
use crate::progress::NoopProgress;
use crate::progress::ProgressCallback;
use crate::progress::ProgressReader;
use crate::report::CreationReport;
use crate::resolve::ResolvedFile;
use crate::resolve::resolve;
use crate::writer::ArchiveWriter;

/// Creates a newc archive at `output` from `sources`, in order.
///
/// Inputs that fail the skip policy are recorded in the report and produce
/// no entry. The trailer is always written unless a fatal error occurs.
///
/// # Examples
///
/// ```no_run
/// use mkcpio_core::ArchiveConfig;
/// use mkcpio_core::create_archive;
///
/// let report = create_archive(
///     "out.cpio",
///     &["build/kernel.elf", "build/kernel.dtb"],
///     &ArchiveConfig::default(),
/// )?;
/// println!("{} entries", report.files_added);
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
///
/// # Errors
///
/// - `InvalidConfig` if the configuration does not validate
/// - `DestinationOpen` if `output` cannot be created
/// - any fatal error from the writer (see [`CpioError::severity`])
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &ArchiveConfig,
) -> Result<CreationReport> {
    create_archive_with_progress(output, sources, config, &mut NoopProgress)
}

/// Same as [`create_archive`], reporting events to `progress`.
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    output: P,
    sources: &[Q],
    config: &ArchiveConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    config.validate()?;
    let writer = ArchiveWriter::create(output, config.buffer_size)?;
    write_archive(writer, sources, config, progress)
}

/// Runs the archive loop on an already opened writer and finishes it.
///
/// # Errors
///
/// Returns the first fatal error. The writer is released before returning.
pub fn write_archive<W, E, Q>(
    mut writer: ArchiveWriter<W, E>,
    sources: &[Q],
    config: &ArchiveConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport>
where
    W: Write,
    E: EntryEncoder,
    Q: AsRef<Path>,
{
    let start = Instant::now();
    let mut report = CreationReport::new();
    let total = sources.len();

    for (index, source) in sources.iter().enumerate() {
        let path = source.as_ref();
        progress.on_entry_start(path, total, index + 1);

        let resolved = match resolve(path, config) {
            Ok(resolved) => resolved,
            Err(reason) => {
                let reason = reason.to_string();
                progress.on_entry_skipped(path, &reason);
                report.add_skipped(path, reason);
                continue;
            }
        };

        append_one(&mut writer, resolved, &mut report, progress)?;
    }

    writer.finish()?;
    report.bytes_written = writer.bytes_written();
    report.duration = start.elapsed();
    progress.on_complete();

    Ok(report)
}

fn append_one<W: Write, E: EntryEncoder>(
    writer: &mut ArchiveWriter<W, E>,
    resolved: ResolvedFile,
    report: &mut CreationReport,
    progress: &mut dyn ProgressCallback,
) -> Result<()> {
    let meta = resolved.metadata();
    let ResolvedFile {
        source, name, file, ..
    } = resolved;

    let result = {
        // the handle is closed when the reader goes out of scope
        let mut reader = ProgressReader::new(file, &mut *progress);
        writer.append(&name, &meta, &mut reader)
    };

    match result {
        Ok(stats) => {
            report.files_added += 1;
            report.bytes_read += stats.content_bytes;
            progress.on_entry_complete(&source);
            Ok(())
        }
        Err(err) => {
            if err.severity() == Severity::Warning {
                progress.on_warning(&source, &err.to_string());
            } else {
                progress.on_entry_failed(&source, &err);
            }
            record_failure(&source, err, meta.size, report)
        }
    }
}

fn record_failure(
    source: &Path,
    err: CpioError,
    declared: u64,
    report: &mut CreationReport,
) -> Result<()> {
    match err.severity() {
        Severity::Fatal => Err(err),
        Severity::Warning => {
            // content is in the archive; only the trailing padding is suspect
            report.files_added += 1;
            report.bytes_read += declared;
            report.add_warning(format!("finishing '{}': {err}", source.display()));
            Ok(())
        }
        Severity::Skip => {
            if err.is_content_failure() {
                // a full-size record is in the archive but its content is wrong
                report.entries_failed += 1;
                report.bytes_read += declared;
                report.add_warning(format!("{}: {err}", source.display()));
            } else {
                report.add_skipped(source, format!("couldn't write header: {err}"));
            }
            Ok(())
        }
    }
}

/// Builder for creating archives with a fluent API.
///
/// # Examples
///
/// ```no_run
/// use mkcpio_core::ArchiveCreator;
///
/// let report = ArchiveCreator::new()
///     .output("initrd.cpio")
///     .add_source("build/kernel.elf")
///     .add_source("build/kernel.dtb")
///     .create()?;
///
/// println!("Archived {} files", report.files_added);
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveCreator {
    output_path: Option<PathBuf>,
    sources: Vec<PathBuf>,
    config: ArchiveConfig,
}

impl ArchiveCreator {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the destination path.
    #[must_use]
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Appends one input file.
    #[must_use]
    pub fn add_source<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources.push(path.as_ref().to_path_buf());
        self
    }

    /// Appends several input files, keeping their order.
    #[must_use]
    pub fn sources<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.sources
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the copy buffer size.
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Sets whether symlink inputs are followed.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.follow_symlinks = follow;
        self
    }

    /// Creates the archive.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if no output path was set
    /// - anything [`create_archive`] returns
    pub fn create(self) -> Result<CreationReport> {
        self.create_with_progress(&mut NoopProgress)
    }

    /// Creates the archive, reporting events to `progress`.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_with_progress(
        self,
        progress: &mut dyn ProgressCallback,
    ) -> Result<CreationReport> {
        let output = self
            .output_path
            .ok_or_else(|| CpioError::InvalidConfig("output path not set".to_string()))?;
        create_archive_with_progress(output, &self.sources, &self.config, progress)
    }
}
