//! Host metadata and its normalized, archive-side counterpart.
//!
//! Every field that depends on the host, the user, or the clock is dropped
//! here. Only the byte length and the mode bits survive into the archive.

use std::fs::Metadata;

/// Mask selecting the file-type bits of a mode.
pub const S_IFMT: u32 = 0o170_000;

/// File-type bits of a regular file.
pub const S_IFREG: u32 = 0o100_000;

/// File type encoded in the `S_IFMT` bits of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Character device.
    CharDevice,
    /// Block device.
    BlockDevice,
    /// Named pipe.
    Fifo,
    /// Unix domain socket.
    Socket,
    /// Type bits that match none of the above.
    Unknown,
}

impl FileKind {
    /// Classifies the type bits of `mode`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mkcpio_core::FileKind;
    ///
    /// assert_eq!(FileKind::from_mode(0o100_644), FileKind::Regular);
    /// assert_eq!(FileKind::from_mode(0o040_755), FileKind::Directory);
    /// ```
    #[must_use]
    pub const fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            0o100_000 => Self::Regular,
            0o040_000 => Self::Directory,
            0o120_000 => Self::Symlink,
            0o020_000 => Self::CharDevice,
            0o060_000 => Self::BlockDevice,
            0o010_000 => Self::Fifo,
            0o140_000 => Self::Socket,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` for regular files.
    #[must_use]
    pub const fn is_regular(self) -> bool {
        matches!(self, Self::Regular)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Regular => "regular file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::CharDevice => "character device",
            Self::BlockDevice => "block device",
            Self::Fifo => "fifo",
            Self::Socket => "socket",
            Self::Unknown => "unknown file type",
        };
        f.write_str(name)
    }
}

/// File status as reported by the host, copied field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStat {
    /// Byte length.
    pub size: u64,
    /// Type and permission bits.
    pub mode: u32,
    /// Owner user id.
    pub uid: u32,
    /// Owner group id.
    pub gid: u32,
    /// Containing device.
    pub dev: u64,
    /// Inode number.
    pub ino: u64,
    /// Device number for special files.
    pub rdev: u64,
    /// Hard link count.
    pub nlink: u64,
    /// Last access, seconds since the epoch.
    pub atime: i64,
    /// Last modification, seconds since the epoch.
    pub mtime: i64,
    /// Last status change, seconds since the epoch.
    pub ctime: i64,
}

impl RawStat {
    /// Copies the status of an opened file.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            size: meta.size(),
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            dev: meta.dev(),
            ino: meta.ino(),
            rdev: meta.rdev(),
            nlink: meta.nlink(),
            atime: meta.atime(),
            mtime: meta.mtime(),
            ctime: meta.ctime(),
        }
    }

    /// Copies the status of an opened file.
    ///
    /// Hosts without POSIX modes get `0644`, or `0444` for read-only files,
    /// with type bits derived from the file type.
    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(meta: &Metadata) -> Self {
        let file_type = meta.file_type();
        let type_bits = if file_type.is_file() {
            S_IFREG
        } else if file_type.is_dir() {
            0o040_000
        } else if file_type.is_symlink() {
            0o120_000
        } else {
            0
        };
        let perm_bits = if meta.permissions().readonly() {
            0o444
        } else {
            0o644
        };

        Self {
            size: meta.len(),
            mode: type_bits | perm_bits,
            nlink: 1,
            ..Self::default()
        }
    }

    /// Returns the file type encoded in the mode.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        FileKind::from_mode(self.mode)
    }
}

/// Metadata as it is written into the archive.
///
/// Only `size` and `mode` carry information. Ownership, device, inode and
/// timestamps are fixed so that the encoded header depends on nothing but
/// the file's contents, name and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedMetadata {
    /// Content length in bytes.
    pub size: u64,
    /// Type and permission bits, copied verbatim.
    pub mode: u32,
    /// Always 0.
    pub uid: u32,
    /// Always 0.
    pub gid: u32,
    /// Always 0.
    pub dev: u64,
    /// Always 0.
    pub ino: u64,
    /// Always `None`.
    pub mtime: Option<i64>,
    /// Always `None`.
    pub atime: Option<i64>,
    /// Always `None`.
    pub ctime: Option<i64>,
    /// Always `None`.
    pub birthtime: Option<i64>,
}

impl NormalizedMetadata {
    /// Builds normalized metadata for a regular file of `size` bytes with the
    /// permission bits of `mode`.
    ///
    /// The type bits of `mode` are replaced with those of a regular file.
    ///
    /// # Examples
    ///
    /// ```
    /// use mkcpio_core::NormalizedMetadata;
    ///
    /// let meta = NormalizedMetadata::regular(42, 0o755);
    /// assert_eq!(meta.mode, 0o100_755);
    /// assert_eq!(meta.uid, 0);
    /// ```
    #[must_use]
    pub const fn regular(size: u64, mode: u32) -> Self {
        Self::zeroed(size, (mode & !S_IFMT) | S_IFREG)
    }

    const fn zeroed(size: u64, mode: u32) -> Self {
        Self {
            size,
            mode,
            uid: 0,
            gid: 0,
            dev: 0,
            ino: 0,
            mtime: None,
            atime: None,
            ctime: None,
            birthtime: None,
        }
    }

    /// Permission bits of the mode (everything below the type bits).
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & !S_IFMT
    }
}

/// Derives the archived metadata from host file status.
///
/// `size` and `mode` are copied; everything else is zeroed or marked absent.
///
/// # Examples
///
/// ```
/// use mkcpio_core::RawStat;
/// use mkcpio_core::metadata::normalize;
///
/// let raw = RawStat {
///     size: 1000,
///     mode: 0o100_644,
///     uid: 1000,
///     gid: 1000,
///     ino: 123_456,
///     mtime: 1_600_000_000,
///     ..RawStat::default()
/// };
/// let meta = normalize(&raw);
/// assert_eq!(meta.size, 1000);
/// assert_eq!(meta.mode, 0o100_644);
/// assert_eq!((meta.uid, meta.gid, meta.ino), (0, 0, 0));
/// assert_eq!(meta.mtime, None);
/// ```
#[must_use]
pub const fn normalize(raw: &RawStat) -> NormalizedMetadata {
    NormalizedMetadata::zeroed(raw.size, raw.mode)
}
