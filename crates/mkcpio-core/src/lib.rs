//! Reproducible newc cpio archive writer.
//!
//! `mkcpio-core` packs a list of regular files into a flat SVR4 "new ASCII"
//! (newc) cpio archive. Each entry is named after the final component of its
//! input path, and all metadata except size and permission bits is zeroed, so
//! the same input contents always produce byte-identical archives.
//!
//! # Examples
//!
//! ```no_run
//! use mkcpio_core::ArchiveConfig;
//! use mkcpio_core::create_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::default();
//! let report = create_archive("images.cpio", &["build/kernel.elf"], &config)?;
//! println!("Archived {} files", report.files_added);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod creator;
pub mod encoder;
pub mod error;
pub mod format;
pub mod io;
pub mod metadata;
pub mod progress;
pub mod report;
pub mod resolve;
pub mod test_utils;
pub mod writer;

// Re-export main API types
pub use config::ArchiveConfig;
pub use creator::ArchiveCreator;
pub use creator::create_archive;
pub use creator::create_archive_with_progress;
pub use creator::write_archive;
pub use encoder::EntryEncoder;
pub use encoder::EntryStats;
pub use encoder::NewcEncoder;
pub use error::CpioError;
pub use error::Result;
pub use error::Severity;
pub use error::SkipReason;
pub use metadata::FileKind;
pub use metadata::NormalizedMetadata;
pub use metadata::RawStat;
pub use progress::NoopProgress;
pub use progress::ProgressCallback;
pub use report::CreationReport;
pub use report::SkippedFile;
pub use resolve::ResolvedFile;
pub use writer::ArchiveWriter;
