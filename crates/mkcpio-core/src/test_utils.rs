//! Test utilities for reading back and checking newc archives.
//!
//! The parser here is deliberately strict: it accepts only what this crate
//! writes (newc magic, zero check field, 4-byte alignment, a trailer at the
//! very end) and reports anything else as an error string.
//!
//! # Panics
//!
//! Helpers that write files may panic on I/O errors since they are designed
//! for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;
use std::path::PathBuf;

use crate::format::newc::HEADER_LEN;
use crate::format::newc::MAGIC;
use crate::format::newc::TRAILER_NAME;
use crate::format::newc::padding_len;

/// One record read back from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Entry name without the trailing NUL.
    pub name: Vec<u8>,
    /// Inode field.
    pub ino: u32,
    /// Mode field.
    pub mode: u32,
    /// Owner user id field.
    pub uid: u32,
    /// Owner group id field.
    pub gid: u32,
    /// Link count field.
    pub nlink: u32,
    /// Modification time field.
    pub mtime: u32,
    /// Device major and minor fields.
    pub dev: (u32, u32),
    /// Special-file device major and minor fields.
    pub rdev: (u32, u32),
    /// Entry content.
    pub data: Vec<u8>,
}

impl ParsedEntry {
    /// Entry name as a lossy string.
    #[must_use]
    pub fn name_str(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

fn read_hex_u32(field: &[u8]) -> Result<u32, String> {
    if !field.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(format!(
            "field {:?} is not lowercase hex",
            String::from_utf8_lossy(field)
        ));
    }
    let text = std::str::from_utf8(field).map_err(|e| e.to_string())?;
    u32::from_str_radix(text, 16).map_err(|e| e.to_string())
}

fn take<'a>(data: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], String> {
    let end = pos
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| format!("truncated archive at offset {pos}"))?;
    let slice = &data[*pos..end];
    *pos = end;
    Ok(slice)
}

/// Parses a complete newc archive, trailer excluded from the result.
///
/// # Errors
///
/// Returns a description of the first structural problem found.
///
/// # Examples
///
/// ```
/// use mkcpio_core::ArchiveWriter;
/// use mkcpio_core::NormalizedMetadata;
/// use mkcpio_core::test_utils::parse_archive;
///
/// let mut writer = ArchiveWriter::new(Vec::new());
/// writer.append(b"a.txt", &NormalizedMetadata::regular(3, 0o644), &mut &b"abc"[..])?;
/// let entries = parse_archive(&writer.into_inner()?).unwrap();
///
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].data, b"abc");
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
pub fn parse_archive(data: &[u8]) -> Result<Vec<ParsedEntry>, String> {
    let mut entries = Vec::new();
    let mut pos = 0usize;

    loop {
        if pos % 4 != 0 {
            return Err(format!("record at offset {pos} is not 4-byte aligned"));
        }
        let header = take(data, &mut pos, HEADER_LEN)?;
        if &header[..6] != MAGIC {
            return Err(format!("bad magic at offset {}", pos - HEADER_LEN));
        }

        let mut fields = [0u32; 13];
        for (i, field) in fields.iter_mut().enumerate() {
            let start = 6 + i * 8;
            *field = read_hex_u32(&header[start..start + 8])?;
        }
        let [ino, mode, uid, gid, nlink, mtime, filesize, devmaj, devmin, rdevmaj, rdevmin, namesize, check] =
            fields;

        if check != 0 {
            return Err(format!("non-zero check field {check:#x}"));
        }
        if namesize == 0 {
            return Err("namesize of zero".to_string());
        }

        let raw_name = take(data, &mut pos, namesize as usize)?;
        let (last, name) = raw_name
            .split_last()
            .ok_or_else(|| "empty name field".to_string())?;
        if *last != 0 {
            return Err("name is not NUL-terminated".to_string());
        }
        let pad = padding_len(pos as u64);
        take(data, &mut pos, pad)?;

        let body = take(data, &mut pos, filesize as usize)?.to_vec();
        let pad = padding_len(pos as u64);
        take(data, &mut pos, pad)?;

        if name == TRAILER_NAME {
            if pos != data.len() {
                return Err(format!("{} bytes after trailer", data.len() - pos));
            }
            return Ok(entries);
        }

        entries.push(ParsedEntry {
            name: name.to_vec(),
            ino,
            mode,
            uid,
            gid,
            nlink,
            mtime,
            dev: (devmaj, devmin),
            rdev: (rdevmaj, rdevmin),
            data: body,
        });
    }
}

/// Writes each `(name, content)` pair under `dir` and returns their paths.
///
/// # Examples
///
/// ```
/// use mkcpio_core::test_utils::write_inputs;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let paths = write_inputs(dir.path(), &[("a.bin", b"1"), ("b.bin", b"22")]);
/// assert_eq!(paths.len(), 2);
/// ```
pub fn write_inputs(dir: &Path, files: &[(&str, &[u8])]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&path, content).unwrap();
            path
        })
        .collect()
}
