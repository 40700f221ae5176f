//! Progress hooks for archive creation.

use std::io::Read;
use std::path::Path;

use crate::CpioError;

/// Callback interface for observing an archive creation run.
///
/// Every hook is called from the thread running the archive loop, in input
/// order. Skips and warnings are delivered as they happen so a front end can
/// print them immediately.
pub trait ProgressCallback {
    /// Called before an input is resolved.
    ///
    /// # Arguments
    ///
    /// * `path` - Input path as given
    /// * `total` - Number of inputs
    /// * `current` - Input number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called as content bytes are copied into the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after an entry was written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called when the skip policy rejects an input.
    fn on_entry_skipped(&mut self, path: &Path, reason: &str);

    /// Called when encoding an accepted input fails.
    ///
    /// Use [`CpioError::severity`] to tell whether the run goes on, and
    /// [`CpioError::is_content_failure`] to tell whether a damaged record was
    /// left in the archive.
    fn on_entry_failed(&mut self, path: &Path, error: &CpioError);

    /// Called for problems that do not stop the run.
    fn on_warning(&mut self, path: &Path, message: &str);

    /// Called once after the trailer was written.
    fn on_complete(&mut self);
}

/// `ProgressCallback` that ignores every event.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_entry_skipped(&mut self, _path: &Path, _reason: &str) {}

    fn on_entry_failed(&mut self, _path: &Path, _error: &CpioError) {}

    fn on_warning(&mut self, _path: &Path, _message: &str) {}

    fn on_complete(&mut self) {}
}

/// Reader that forwards byte counts to a progress callback.
///
/// Counts are batched and flushed when the threshold is reached and on drop.
pub struct ProgressReader<'a, R> {
    inner: R,
    progress: &'a mut dyn ProgressCallback,
    pending: u64,
    batch_threshold: u64,
}

impl<'a, R> ProgressReader<'a, R> {
    /// Wraps `inner`, reporting every 1 MiB.
    #[must_use]
    pub fn new(inner: R, progress: &'a mut dyn ProgressCallback) -> Self {
        Self::with_batch_threshold(inner, progress, 1024 * 1024)
    }

    /// Wraps `inner`, reporting every `batch_threshold` bytes.
    #[must_use]
    pub fn with_batch_threshold(
        inner: R,
        progress: &'a mut dyn ProgressCallback,
        batch_threshold: u64,
    ) -> Self {
        Self {
            inner,
            progress,
            pending: 0,
            batch_threshold: batch_threshold.max(1),
        }
    }

    fn flush_pending(&mut self) {
        if self.pending > 0 {
            self.progress.on_bytes_written(self.pending);
            self.pending = 0;
        }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pending += n as u64;
        if self.pending >= self.batch_threshold {
            self.flush_pending();
        }
        Ok(n)
    }
}

impl<R> Drop for ProgressReader<'_, R> {
    fn drop(&mut self) {
        self.flush_pending();
    }
}
