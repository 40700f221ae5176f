//! Sequential archive writer.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::CpioError;
use crate::Result;
use crate::encoder::EntryEncoder;
use crate::encoder::EntryStats;
use crate::encoder::NewcEncoder;
use crate::io::CountingWriter;
use crate::metadata::NormalizedMetadata;
use crate::resolve::ResolvedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finished,
    Poisoned,
}

/// Appends entries to an archive stream, strictly in order.
///
/// The writer owns the destination for its whole lifetime. [`finish`] writes
/// the trailer exactly once; if the writer is dropped without it, the trailer
/// is written on drop (errors ignored). After a destination failure the
/// writer is poisoned: further appends fail and no trailer is written.
///
/// [`finish`]: ArchiveWriter::finish
///
/// # Examples
///
/// ```
/// use mkcpio_core::ArchiveWriter;
/// use mkcpio_core::NormalizedMetadata;
///
/// let mut writer = ArchiveWriter::new(Vec::new());
/// let meta = NormalizedMetadata::regular(2, 0o644);
/// writer.append(b"hi.txt", &meta, &mut &b"hi"[..])?;
/// let archive = writer.into_inner()?;
///
/// assert!(archive.starts_with(b"070701"));
/// assert_eq!(archive.len() % 4, 0);
/// # Ok::<(), mkcpio_core::CpioError>(())
/// ```
pub struct ArchiveWriter<W: Write, E: EntryEncoder = NewcEncoder> {
    out: Option<CountingWriter<W>>,
    encoder: E,
    state: State,
    entries: usize,
}

impl ArchiveWriter<BufWriter<File>> {
    /// Creates or truncates `path` and opens an archive on it.
    ///
    /// # Errors
    ///
    /// Returns `DestinationOpen` if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, buffer_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| CpioError::DestinationOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::with_encoder(
            BufWriter::new(file),
            NewcEncoder::with_buffer_size(buffer_size),
        ))
    }
}

impl<W: Write> ArchiveWriter<W> {
    /// Opens an archive on `inner` with the newc encoder.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self::with_encoder(inner, NewcEncoder::new())
    }
}

impl<W: Write, E: EntryEncoder> ArchiveWriter<W, E> {
    /// Opens an archive on `inner` with a custom encoder.
    #[must_use]
    pub fn with_encoder(inner: W, encoder: E) -> Self {
        Self {
            out: Some(CountingWriter::new(inner)),
            encoder,
            state: State::Open,
            entries: 0,
        }
    }

    /// Appends one entry.
    ///
    /// On a fatal error the writer is poisoned. On any other error the
    /// stream is still at a record boundary and appending may continue.
    ///
    /// # Errors
    ///
    /// - `WriterClosed` after [`finish`](Self::finish)
    /// - `WriterPoisoned` after an earlier fatal error
    /// - any error from the encoder
    pub fn append(
        &mut self,
        name: &[u8],
        meta: &NormalizedMetadata,
        content: &mut dyn Read,
    ) -> Result<EntryStats> {
        self.ensure_open()?;
        let Some(out) = self.out.as_mut() else {
            return Err(CpioError::WriterClosed);
        };

        let before = out.position();
        let result = self.encoder.encode_entry(out, name, meta, content);
        let advanced = out.position() != before;

        match result {
            Ok(stats) => {
                self.entries += 1;
                Ok(stats)
            }
            Err(err) => {
                if err.is_fatal() {
                    self.state = State::Poisoned;
                } else if advanced {
                    self.entries += 1;
                }
                Err(err)
            }
        }
    }

    /// Appends a resolved input file, releasing its handle afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append).
    pub fn append_file(&mut self, mut file: ResolvedFile) -> Result<EntryStats> {
        let meta = file.metadata();
        self.append(&file.name, &meta, &mut file.file)
    }

    /// Writes the trailer and flushes the destination.
    ///
    /// Calling it again after success is a no-op.
    ///
    /// # Errors
    ///
    /// - `WriterPoisoned` if an earlier destination failure left the stream mid-record
    /// - `Io` if writing the trailer or flushing fails
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            State::Finished => return Ok(()),
            State::Poisoned => {
                if let Some(out) = self.out.as_mut() {
                    let _ = out.flush();
                }
                return Err(CpioError::WriterPoisoned);
            }
            State::Open => {}
        }
        let Some(out) = self.out.as_mut() else {
            return Err(CpioError::WriterClosed);
        };

        let written = self
            .encoder
            .encode_trailer(out)
            .and_then(|_| out.flush().map_err(CpioError::Io));
        match written {
            Ok(()) => {
                self.state = State::Finished;
                Ok(())
            }
            Err(err) => {
                self.state = State::Poisoned;
                Err(err)
            }
        }
    }

    /// Finishes the archive and returns the destination.
    ///
    /// # Errors
    ///
    /// Same as [`finish`](Self::finish).
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        self.out
            .take()
            .map(CountingWriter::into_inner)
            .ok_or(CpioError::WriterClosed)
    }

    /// Bytes written to the destination so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.out.as_ref().map_or(0, CountingWriter::position)
    }

    /// Records written so far, trailer excluded.
    #[must_use]
    pub fn entries_written(&self) -> usize {
        self.entries
    }

    /// Whether the trailer has been written.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Whether a destination failure left the stream mid-record.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.state == State::Poisoned
    }

    /// Short name of the archive format being written.
    #[must_use]
    pub fn format_name(&self) -> &str {
        self.encoder.format_name()
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Finished => Err(CpioError::WriterClosed),
            State::Poisoned => Err(CpioError::WriterPoisoned),
        }
    }
}

impl<W: Write, E: EntryEncoder> Drop for ArchiveWriter<W, E> {
    fn drop(&mut self) {
        if self.out.is_some() {
            let _ = self.finish();
        }
    }
}
