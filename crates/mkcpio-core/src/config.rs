//! Configuration for archive creation.

use crate::CpioError;
use crate::Result;
use crate::io::copy::DEFAULT_BUFFER_SIZE;

/// Smallest accepted copy buffer.
pub const MIN_BUFFER_SIZE: usize = 512;

/// Largest accepted copy buffer.
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Options controlling archive creation.
///
/// None of these options influence the bytes of the produced archive; they
/// only change how inputs are read and which inputs are accepted.
///
/// # Examples
///
/// ```
/// use mkcpio_core::ArchiveConfig;
///
/// let config = ArchiveConfig::default()
///     .with_buffer_size(4096)
///     .with_follow_symlinks(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Size of the buffer used to copy file content into the archive.
    ///
    /// Default: 64 KiB. Valid range: 512 bytes to 16 MiB.
    pub buffer_size: usize,

    /// Archive the target of a symlink given as input.
    ///
    /// Default: `true`. When `false`, symlink inputs are skipped as
    /// "not a regular file".
    pub follow_symlinks: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            follow_symlinks: true,
        }
    }
}

impl ArchiveConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the copy buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets whether symlink inputs are followed.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `buffer_size` is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&self.buffer_size) {
            return Err(CpioError::InvalidConfig(format!(
                "buffer size {} outside {MIN_BUFFER_SIZE}..={MAX_BUFFER_SIZE}",
                self.buffer_size
            )));
        }
        Ok(())
    }
}
