//! Bounded content copy with length verification.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::CpioError;
use crate::Result;

/// Default copy buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer shared by every entry of one archive.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Vec<u8>,
}

impl CopyBuffer {
    /// Allocates a buffer of `size` bytes (at least one).
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            buf: vec![0u8; size.max(1)],
        }
    }

    /// Buffer size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::with_size(DEFAULT_BUFFER_SIZE)
    }
}

/// Outcome of copying a declared number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Bytes copied to the writer; equals the declared length.
    pub copied: u64,
    /// Bytes the source still had after the declared length, if any.
    pub surplus: Option<u64>,
}

/// Copies exactly `len` bytes from `reader` to `writer`.
///
/// After `len` bytes the source is probed once more. Extra bytes are not
/// copied; they are counted (by draining the source) and returned as
/// `surplus` so the caller can finish the record before reporting.
///
/// If the source ends early or fails, the rest of `len` is written as NUL
/// bytes before the error is returned, so the writer always receives exactly
/// `len` bytes unless writing itself fails.
///
/// # Errors
///
/// - `ContentLengthMismatch` if the source ends before `len` bytes
/// - `ContentRead` if reading the source fails
/// - `Io` if writing to `writer` fails
///
/// # Examples
///
/// ```
/// use mkcpio_core::io::{CopyBuffer, copy_exact};
///
/// let mut out = Vec::new();
/// let mut buffer = CopyBuffer::with_size(4);
/// let outcome = copy_exact(&mut &b"hello world"[..], &mut out, 5, &mut buffer)?;
///
/// assert_eq!(out, b"hello");
/// assert_eq!(outcome.surplus, Some(6));
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
pub fn copy_exact<R, W>(
    reader: &mut R,
    writer: &mut W,
    len: u64,
    buffer: &mut CopyBuffer,
) -> Result<CopyOutcome>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut copied: u64 = 0;

    while copied < len {
        let cap = buffer.buf.len();
        let want = usize::try_from(len - copied).map_or(cap, |rest| rest.min(cap));
        let n = match reader.read(&mut buffer.buf[..want]) {
            Ok(0) => {
                fill_zeros(writer, len - copied, buffer)?;
                return Err(CpioError::ContentLengthMismatch {
                    declared: len,
                    actual: copied,
                });
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                fill_zeros(writer, len - copied, buffer)?;
                return Err(CpioError::ContentRead(e));
            }
        };
        writer.write_all(&buffer.buf[..n])?;
        copied += n as u64;
    }

    let surplus = probe_surplus(reader, buffer)?;
    Ok(CopyOutcome { copied, surplus })
}

fn fill_zeros<W>(writer: &mut W, mut remaining: u64, buffer: &mut CopyBuffer) -> Result<()>
where
    W: Write + ?Sized,
{
    buffer.buf.fill(0);
    while remaining > 0 {
        let cap = buffer.buf.len();
        let n = usize::try_from(remaining).map_or(cap, |rest| rest.min(cap));
        writer.write_all(&buffer.buf[..n])?;
        remaining -= n as u64;
    }
    Ok(())
}

fn probe_surplus<R>(reader: &mut R, buffer: &mut CopyBuffer) -> Result<Option<u64>>
where
    R: Read + ?Sized,
{
    let mut extra: u64 = 0;
    loop {
        match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => extra += n as u64,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            // The record is already complete; a failing drain only loses
            // the exact surplus count.
            Err(_) if extra > 0 => break,
            Err(e) => return Err(CpioError::ContentRead(e)),
        }
    }
    Ok((extra > 0).then_some(extra))
}
