//! SVR4 "new ASCII" (newc) cpio record layout.
//!
//! ```text
//! magic    6 bytes  "070701"
//! ino      8 hex    mode     8 hex    uid      8 hex    gid       8 hex
//! nlink    8 hex    mtime    8 hex    filesize 8 hex    devmajor  8 hex
//! devminor 8 hex    rdevmaj  8 hex    rdevmin  8 hex    namesize  8 hex
//! check    8 hex
//! name     namesize bytes, NUL included, padded to a multiple of 4
//! data     filesize bytes, padded to a multiple of 4
//! ```

use crate::CpioError;
use crate::Result;
use crate::metadata::NormalizedMetadata;

/// Magic token of the newc variant.
pub const MAGIC: &[u8; 6] = b"070701";

/// Fixed header length: 6-byte magic plus 13 eight-digit fields.
pub const HEADER_LEN: usize = 110;

/// Name of the record terminating every archive.
pub const TRAILER_NAME: &[u8] = b"TRAILER!!!";

/// Header and body alignment.
pub const ALIGNMENT: usize = 4;

/// Largest value an 8-digit hex field can hold.
pub const MAX_FIELD_VALUE: u64 = 0xFFFF_FFFF;

/// Longest name that fits, leaving room for the trailing NUL in `namesize`.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_NAME_LEN: usize = (MAX_FIELD_VALUE - 1) as usize;

/// Number of NUL bytes needed to bring `len` up to the next multiple of 4.
///
/// # Examples
///
/// ```
/// use mkcpio_core::format::newc::padding_len;
///
/// assert_eq!(padding_len(110 + 11), 3);
/// assert_eq!(padding_len(8), 0);
/// ```
#[must_use]
pub const fn padding_len(len: u64) -> usize {
    let overhang = (len % ALIGNMENT as u64) as usize;
    if overhang == 0 { 0 } else { ALIGNMENT - overhang }
}

/// One newc header, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewcHeader<'a> {
    /// Inode number.
    pub ino: u64,
    /// Type and permission bits.
    pub mode: u64,
    /// Owner user id.
    pub uid: u64,
    /// Owner group id.
    pub gid: u64,
    /// Link count.
    pub nlink: u64,
    /// Modification time.
    pub mtime: u64,
    /// Content length.
    pub filesize: u64,
    /// Major number of the containing device.
    pub dev_major: u64,
    /// Minor number of the containing device.
    pub dev_minor: u64,
    /// Major number for special files.
    pub rdev_major: u64,
    /// Minor number for special files.
    pub rdev_minor: u64,
    /// Entry name without the trailing NUL.
    pub name: &'a [u8],
}

impl<'a> NewcHeader<'a> {
    /// Header for a normalized regular-file entry.
    ///
    /// Device numbers are zero, the link count is 1, and absent timestamps
    /// encode as 0.
    #[must_use]
    pub fn for_entry(name: &'a [u8], meta: &NormalizedMetadata) -> Self {
        Self {
            ino: meta.ino,
            mode: u64::from(meta.mode),
            uid: u64::from(meta.uid),
            gid: u64::from(meta.gid),
            nlink: 1,
            mtime: meta.mtime.map_or(0, |t| t.max(0).unsigned_abs()),
            filesize: meta.size,
            dev_major: 0,
            dev_minor: 0,
            rdev_major: 0,
            rdev_minor: 0,
            name,
        }
    }

    /// Header of the terminating record.
    #[must_use]
    pub const fn trailer() -> Self {
        Self {
            ino: 0,
            mode: 0,
            uid: 0,
            gid: 0,
            nlink: 1,
            mtime: 0,
            filesize: 0,
            dev_major: 0,
            dev_minor: 0,
            rdev_major: 0,
            rdev_minor: 0,
            name: TRAILER_NAME,
        }
    }

    /// Encodes header, name, NUL and alignment padding.
    ///
    /// Nothing is written anywhere; the caller gets either the complete byte
    /// image or an error, so a rejected header never reaches the stream.
    ///
    /// # Errors
    ///
    /// - `EmptyName` if the name is empty
    /// - `NameTooLong` if `namesize` would not fit in 8 hex digits
    /// - `EncodingOverflow` if any numeric field exceeds `0xFFFFFFFF`
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.name.is_empty() {
            return Err(CpioError::EmptyName);
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(CpioError::NameTooLong {
                len: self.name.len(),
                max: MAX_NAME_LEN,
            });
        }
        let namesize = self.name.len() as u64 + 1;
        let padding = padding_len(HEADER_LEN as u64 + namesize);

        let mut buf = Vec::with_capacity(HEADER_LEN + self.name.len() + 1 + padding);
        buf.extend_from_slice(MAGIC);
        push_field(&mut buf, "ino", self.ino)?;
        push_field(&mut buf, "mode", self.mode)?;
        push_field(&mut buf, "uid", self.uid)?;
        push_field(&mut buf, "gid", self.gid)?;
        push_field(&mut buf, "nlink", self.nlink)?;
        push_field(&mut buf, "mtime", self.mtime)?;
        push_field(&mut buf, "filesize", self.filesize)?;
        push_field(&mut buf, "devmajor", self.dev_major)?;
        push_field(&mut buf, "devminor", self.dev_minor)?;
        push_field(&mut buf, "rdevmajor", self.rdev_major)?;
        push_field(&mut buf, "rdevminor", self.rdev_minor)?;
        push_field(&mut buf, "namesize", namesize)?;
        // c_check is only meaningful for the 070702 variant
        push_field(&mut buf, "check", 0)?;
        debug_assert_eq!(buf.len(), HEADER_LEN);

        buf.extend_from_slice(self.name);
        buf.push(0);
        buf.resize(buf.len() + padding, 0);
        Ok(buf)
    }
}

fn push_field(buf: &mut Vec<u8>, field: &'static str, value: u64) -> Result<()> {
    if value > MAX_FIELD_VALUE {
        return Err(CpioError::EncodingOverflow { field, value });
    }
    buf.extend_from_slice(format!("{value:08x}").as_bytes());
    Ok(())
}

/// Complete byte image of the trailer record.
///
/// # Examples
///
/// ```
/// use mkcpio_core::format::newc::trailer_bytes;
///
/// let trailer = trailer_bytes();
/// assert_eq!(trailer.len(), 124);
/// assert!(trailer.starts_with(b"070701"));
/// ```
#[must_use]
pub fn trailer_bytes() -> Vec<u8> {
    // The trailer's fields are constants well inside the field range.
    NewcHeader::trailer().encode().unwrap_or_default()
}
