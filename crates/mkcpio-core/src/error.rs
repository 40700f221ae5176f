//! Error types for archive creation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `CpioError`.
pub type Result<T> = std::result::Result<T, CpioError>;

/// How a failure affects the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The current file is not archived intact; processing continues.
    Skip,
    /// The entry was written but may be malformed; processing continues.
    Warning,
    /// The run cannot continue.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Warning => write!(f, "warning"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Errors that can occur while writing an archive.
#[derive(Error, Debug)]
pub enum CpioError {
    /// I/O on the archive destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The destination could not be created or truncated.
    #[error("cannot open {}: {source}", path.display())]
    DestinationOpen {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The entry name is empty.
    #[error("empty entry name")]
    EmptyName,

    /// The entry name does not fit in the name-size field.
    #[error("entry name too long: {len} bytes (max {max})")]
    NameTooLong {
        /// Name length in bytes, without the trailing NUL.
        len: usize,
        /// Maximum representable length.
        max: usize,
    },

    /// A numeric header field does not fit in 8 hex digits.
    #[error("{field} value {value:#x} does not fit in an 8-digit newc field")]
    EncodingOverflow {
        /// Header field name.
        field: &'static str,
        /// Value that overflowed.
        value: u64,
    },

    /// The content source produced a different number of bytes than declared.
    #[error("content length mismatch: declared {declared} bytes, source had {actual}")]
    ContentLengthMismatch {
        /// Size written into the header.
        declared: u64,
        /// Bytes the source produced (at least `declared + 1` when it grew).
        actual: u64,
    },

    /// Reading the content source failed after the header was written.
    ///
    /// The rest of the record is NUL-filled.
    #[error("read failed mid-entry: {0}")]
    ContentRead(#[source] io::Error),

    /// Writing the trailing body padding failed.
    #[error("couldn't finish entry: {0}")]
    FinishEntry(#[source] io::Error),

    /// An entry was appended after the trailer was written.
    #[error("archive already finished")]
    WriterClosed,

    /// An earlier fatal error left the stream between record boundaries.
    #[error("archive stream is not at a record boundary after an earlier failure")]
    WriterPoisoned,

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CpioError {
    /// Classifies this error.
    ///
    /// Header-level problems are detected before any byte reaches the
    /// stream, so they only cost the current entry. A source whose length
    /// changed or whose read failed still leaves a complete, aligned record
    /// behind: surplus bytes are dropped and missing ones are NUL-filled.
    /// Only destination I/O and writer misuse end the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use mkcpio_core::CpioError;
    /// use mkcpio_core::Severity;
    ///
    /// let err = CpioError::EncodingOverflow { field: "filesize", value: 1 << 32 };
    /// assert_eq!(err.severity(), Severity::Skip);
    ///
    /// let err = CpioError::ContentLengthMismatch { declared: 10, actual: 4 };
    /// assert_eq!(err.severity(), Severity::Skip);
    ///
    /// let err = CpioError::WriterPoisoned;
    /// assert_eq!(err.severity(), Severity::Fatal);
    /// ```
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::EmptyName
            | Self::NameTooLong { .. }
            | Self::EncodingOverflow { .. }
            | Self::ContentLengthMismatch { .. }
            | Self::ContentRead(_) => Severity::Skip,
            Self::FinishEntry(_) => Severity::Warning,
            Self::Io(_)
            | Self::DestinationOpen { .. }
            | Self::WriterClosed
            | Self::WriterPoisoned
            | Self::InvalidConfig(_) => Severity::Fatal,
        }
    }

    /// Returns `true` if the run must stop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity(), Severity::Fatal)
    }

    /// Returns `true` if processing can continue with the next file.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns `true` if the source misbehaved after its header was written.
    ///
    /// The archive then holds a full-size record whose content is cut at the
    /// declared size or NUL-filled up to it.
    #[must_use]
    pub const fn is_content_failure(&self) -> bool {
        matches!(
            self,
            Self::ContentLengthMismatch { .. } | Self::ContentRead(_)
        )
    }

    /// Returns `true` if the error happened while setting up the archive,
    /// before any entry was attempted.
    #[must_use]
    pub const fn is_setup_failure(&self) -> bool {
        matches!(self, Self::DestinationOpen { .. } | Self::InvalidConfig(_))
    }
}

/// Why an input file was skipped without producing an entry.
#[derive(Error, Debug)]
pub enum SkipReason {
    /// The path has no usable final component.
    #[error("nonsense filename")]
    NonsenseFilename,

    /// Opening the file for reading failed.
    #[error("couldn't open: {0}")]
    CouldNotOpen(#[source] io::Error),

    /// Querying the status of the opened file failed.
    #[error("couldn't stat: {0}")]
    StatFailed(#[source] io::Error),

    /// The path names something other than a regular file.
    #[error("not a regular file ({kind})")]
    NotRegularFile {
        /// What the path actually is.
        kind: crate::metadata::FileKind,
    },
}
