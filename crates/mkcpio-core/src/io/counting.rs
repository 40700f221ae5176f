//! Byte-counting writer for the archive stream.

use std::io::Write;

use crate::format::newc::ALIGNMENT;

/// Wraps the archive destination and tracks the stream offset.
///
/// The offset is what the padding rules of the format are defined against,
/// and at every record boundary it is a multiple of four.
///
/// # Examples
///
/// ```
/// use mkcpio_core::io::CountingWriter;
/// use std::io::Write;
///
/// let mut writer = CountingWriter::new(Vec::new());
/// writer.write_all(b"0707")?;
/// assert_eq!(writer.position(), 4);
/// assert!(writer.is_aligned());
///
/// writer.write_all(b"01")?;
/// assert!(!writer.is_aligned());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    position: u64,
}

impl<W> CountingWriter<W> {
    /// Wraps `inner`, starting the count at zero.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes successfully written so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the offset sits on a 4-byte boundary.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.position % ALIGNMENT as u64 == 0
    }

    /// Returns a reference to the inner writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the inner writer.
    ///
    /// Bytes written through it are not counted.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwraps the inner writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
