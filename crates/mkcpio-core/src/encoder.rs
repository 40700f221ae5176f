//! Entry encoding.
//!
//! The writer only talks to the [`EntryEncoder`] trait, so the byte layout can
//! be produced by the built-in [`NewcEncoder`] or by any other implementation
//! that emits the same stream.

use std::io::Read;
use std::io::Write;

use crate::CpioError;
use crate::Result;
use crate::format::newc::NewcHeader;
use crate::format::newc::padding_len;
use crate::format::newc::trailer_bytes;
use crate::io::CopyBuffer;
use crate::io::copy_exact;
use crate::metadata::NormalizedMetadata;

const ZEROS: [u8; 4] = [0; 4];

/// Byte counts of one encoded entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryStats {
    /// Header, name, NUL and name padding.
    pub header_bytes: u64,
    /// File content.
    pub content_bytes: u64,
    /// Body padding.
    pub padding_bytes: u64,
}

impl EntryStats {
    /// Total bytes appended to the stream.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.header_bytes + self.content_bytes + self.padding_bytes
    }
}

/// Encodes entries and the trailer into an archive stream.
pub trait EntryEncoder {
    /// Appends one entry: header, name, content and padding.
    ///
    /// Implementations must validate everything that can be validated before
    /// the first byte is written, and must not seek.
    ///
    /// # Errors
    ///
    /// See [`CpioError::severity`] for how each error affects the stream.
    fn encode_entry(
        &mut self,
        out: &mut dyn Write,
        name: &[u8],
        meta: &NormalizedMetadata,
        content: &mut dyn Read,
    ) -> Result<EntryStats>;

    /// Appends the terminating record and returns its length.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn encode_trailer(&mut self, out: &mut dyn Write) -> Result<u64>;

    /// Short name of the produced format.
    fn format_name(&self) -> &str;
}

/// From-scratch encoder for the newc layout.
///
/// # Examples
///
/// ```
/// use mkcpio_core::EntryEncoder;
/// use mkcpio_core::NewcEncoder;
/// use mkcpio_core::NormalizedMetadata;
///
/// let mut encoder = NewcEncoder::new();
/// let mut out = Vec::new();
/// let meta = NormalizedMetadata::regular(5, 0o644);
///
/// let stats = encoder.encode_entry(&mut out, b"hello.txt", &meta, &mut &b"hello"[..])?;
/// assert_eq!(stats.total(), out.len() as u64);
/// assert_eq!(out.len() % 4, 0);
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
#[derive(Debug, Default)]
pub struct NewcEncoder {
    buffer: CopyBuffer,
}

impl NewcEncoder {
    /// Creates an encoder with the default copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder whose copy buffer holds `buffer_size` bytes.
    #[must_use]
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer: CopyBuffer::with_size(buffer_size),
        }
    }
}

impl EntryEncoder for NewcEncoder {
    fn encode_entry(
        &mut self,
        out: &mut dyn Write,
        name: &[u8],
        meta: &NormalizedMetadata,
        content: &mut dyn Read,
    ) -> Result<EntryStats> {
        let header = NewcHeader::for_entry(name, meta).encode()?;
        out.write_all(&header)?;

        // a failed source is already NUL-filled to the declared size
        let copied = match copy_exact(content, out, meta.size, &mut self.buffer) {
            Err(err) if !err.is_content_failure() => return Err(err),
            copied => copied,
        };

        // header.len() is already a multiple of 4, so only the size matters
        let padding = padding_len(meta.size);
        out.write_all(&ZEROS[..padding])
            .map_err(CpioError::FinishEntry)?;

        let outcome = copied?;
        if let Some(extra) = outcome.surplus {
            return Err(CpioError::ContentLengthMismatch {
                declared: meta.size,
                actual: meta.size.saturating_add(extra),
            });
        }

        Ok(EntryStats {
            header_bytes: header.len() as u64,
            content_bytes: outcome.copied,
            padding_bytes: padding as u64,
        })
    }

    fn encode_trailer(&mut self, out: &mut dyn Write) -> Result<u64> {
        let trailer = trailer_bytes();
        out.write_all(&trailer)?;
        Ok(trailer.len() as u64)
    }

    fn format_name(&self) -> &str {
        "newc"
    }
}
