//! Input resolution and skip policy.
//!
//! Each input path is reduced to its final component, opened, and checked on
//! the opened handle. Any problem is a [`SkipReason`]: the file produces no
//! entry and the run goes on.

use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use crate::SkipReason;
use crate::config::ArchiveConfig;
use crate::metadata::FileKind;
use crate::metadata::NormalizedMetadata;
use crate::metadata::RawStat;
use crate::metadata::normalize;

/// An input that passed the skip policy, with its file still open.
#[derive(Debug)]
pub struct ResolvedFile {
    /// Path as given on input.
    pub source: PathBuf,
    /// Entry name: the final path component.
    pub name: Vec<u8>,
    /// Open handle the content is read from.
    pub file: File,
    /// Status of the opened handle.
    pub stat: RawStat,
}

impl ResolvedFile {
    /// Metadata to archive for this file.
    #[must_use]
    pub fn metadata(&self) -> NormalizedMetadata {
        normalize(&self.stat)
    }

    /// Entry name for display.
    #[must_use]
    pub fn display_name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// Returns the final component of `path` as raw bytes.
///
/// A path without a separator is its own basename. A path ending in a
/// separator, and the empty path, have none.
///
/// # Examples
///
/// ```
/// use mkcpio_core::resolve::basename;
/// use std::path::Path;
///
/// assert_eq!(basename(Path::new("a/b/c.elf")), Some(&b"c.elf"[..]));
/// assert_eq!(basename(Path::new("kernel.elf")), Some(&b"kernel.elf"[..]));
/// assert_eq!(basename(Path::new("images/")), None);
/// ```
#[must_use]
pub fn basename(path: &Path) -> Option<&[u8]> {
    let bytes = path.as_os_str().as_encoded_bytes();
    let start = bytes
        .iter()
        .rposition(|&b| b.is_ascii() && std::path::is_separator(char::from(b)))
        .map_or(0, |i| i + 1);
    let name = &bytes[start..];
    if name.is_empty() { None } else { Some(name) }
}

/// Applies the skip policy to one input path.
///
/// # Errors
///
/// - `NonsenseFilename` if the path has no final component
/// - `NotRegularFile` if the path is a symlink and symlinks are not followed
/// - `CouldNotOpen` if the file cannot be opened for reading
/// - `StatFailed` if the opened handle cannot be queried
/// - `NotRegularFile` if the opened file is not a regular file
pub fn resolve(path: &Path, config: &ArchiveConfig) -> Result<ResolvedFile, SkipReason> {
    let name = basename(path).ok_or(SkipReason::NonsenseFilename)?.to_vec();

    if !config.follow_symlinks {
        let link_meta = std::fs::symlink_metadata(path).map_err(SkipReason::CouldNotOpen)?;
        if link_meta.file_type().is_symlink() {
            return Err(SkipReason::NotRegularFile {
                kind: FileKind::Symlink,
            });
        }
    }

    let file = open_for_reading(path, config).map_err(SkipReason::CouldNotOpen)?;
    let meta = file.metadata().map_err(SkipReason::StatFailed)?;
    let stat = RawStat::from_metadata(&meta);

    let kind = stat.kind();
    if !kind.is_regular() {
        // `file` is dropped here, releasing the handle
        return Err(SkipReason::NotRegularFile { kind });
    }

    Ok(ResolvedFile {
        source: path.to_path_buf(),
        name,
        file,
        stat,
    })
}

#[cfg(unix)]
fn open_for_reading(path: &Path, config: &ArchiveConfig) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    // O_NONBLOCK keeps a FIFO from stalling the open; it has no effect on
    // reads from regular files.
    let mut flags = libc::O_NONBLOCK;
    if !config.follow_symlinks {
        flags |= libc::O_NOFOLLOW;
    }
    OpenOptions::new().read(true).custom_flags(flags).open(path)
}

#[cfg(not(unix))]
fn open_for_reading(path: &Path, _config: &ArchiveConfig) -> std::io::Result<File> {
    OpenOptions::new().read(true).open(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_basename_strips_directories() {
        assert_eq!(basename(Path::new("a/b/c.elf")), Some(&b"c.elf"[..]));
        assert_eq!(basename(Path::new("/abs/kernel.dtb")), Some(&b"kernel.dtb"[..]));
        assert_eq!(basename(Path::new("./x")), Some(&b"x"[..]));
    }

    #[test]
    fn test_basename_without_separator() {
        assert_eq!(basename(Path::new("kernel.elf")), Some(&b"kernel.elf"[..]));
    }

    #[test]
    fn test_basename_rejects_trailing_separator() {
        assert_eq!(basename(Path::new("dir/")), None);
        assert_eq!(basename(Path::new("/")), None);
        assert_eq!(basename(Path::new("")), None);
    }

    #[test]
    fn test_resolve_regular_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kernel.elf");
        fs::write(&path, vec![0x7f; 1000]).unwrap();

        let resolved = resolve(&path, &ArchiveConfig::default()).unwrap();
        assert_eq!(resolved.name, b"kernel.elf");
        assert_eq!(resolved.display_name(), "kernel.elf");
        assert_eq!(resolved.source, path);
        assert_eq!(resolved.metadata().size, 1000);
        assert_eq!(resolved.stat.kind(), FileKind::Regular);
    }

    #[test]
    fn test_resolve_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = resolve(&temp.path().join("missing"), &ArchiveConfig::default()).unwrap_err();
        assert!(matches!(err, SkipReason::CouldNotOpen(_)));
        assert!(err.to_string().starts_with("couldn't open"));
    }

    #[test]
    fn test_resolve_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("subdir");
        fs::create_dir(&dir).unwrap();

        let err = resolve(&dir, &ArchiveConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::NotRegularFile {
                kind: FileKind::Directory
            }
        ));
    }

    #[test]
    fn test_resolve_trailing_separator() {
        let err = resolve(Path::new("some/dir/"), &ArchiveConfig::default()).unwrap_err();
        assert!(matches!(err, SkipReason::NonsenseFilename));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_follows_symlink_by_default() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real.bin");
        fs::write(&target, b"payload").unwrap();
        let link = temp.path().join("alias.bin");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let resolved = resolve(&link, &ArchiveConfig::default()).unwrap();
        assert_eq!(resolved.name, b"alias.bin");
        assert_eq!(resolved.metadata().size, 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_symlink_rejected_when_not_following() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real.bin");
        fs::write(&target, b"payload").unwrap();
        let link = temp.path().join("alias.bin");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let config = ArchiveConfig::default().with_follow_symlinks(false);
        let err = resolve(&link, &config).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::NotRegularFile {
                kind: FileKind::Symlink
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_dangling_symlink() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("nowhere"), &link).unwrap();

        let err = resolve(&link, &ArchiveConfig::default()).unwrap_err();
        assert!(matches!(err, SkipReason::CouldNotOpen(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_fifo_does_not_block() {
        let temp = TempDir::new().unwrap();
        let fifo = temp.path().join("pipe");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status();
        if !matches!(status, Ok(s) if s.success()) {
            return;
        }

        let err = resolve(&fifo, &ArchiveConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SkipReason::NotRegularFile {
                kind: FileKind::Fifo
            }
        ));
    }
}
