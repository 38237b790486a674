//! A uniform byte-source abstraction over directory entries, archive entries and in-memory
//! buffers.
//!
//! Every `ByteSource` owns its underlying reader, so scoped acquisition falls out of ordinary
//! Rust ownership: dropping a `ByteSource` — on every exit path, including an early `?` return —
//! closes the underlying file handle.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// A source of class-file or resource bytes, positioned at its start.
pub struct ByteSource {
    inner: Inner,
    length: Option<u64>,
}

enum Inner {
    File(BufReader<File>),
    Memory(Cursor<Vec<u8>>),
}

impl Read for Inner {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(r) => r.read(buf),
            Self::Memory(r) => r.read(buf),
        }
    }
}

impl BufRead for Inner {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::File(r) => r.fill_buf(),
            Self::Memory(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::File(r) => r.consume(amt),
            Self::Memory(r) => r.consume(amt),
        }
    }
}

impl ByteSource {
    /// Opens a file on disk.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata().ok().map(|m| m.len());
        Ok(Self {
            inner: Inner::File(BufReader::new(file)),
            length,
        })
    }

    /// Wraps an in-memory buffer, as used for archive entries (read fully up front since
    /// `zip`'s entry readers borrow their archive) and for caller-supplied in-memory roots.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u64;
        Self {
            inner: Inner::Memory(Cursor::new(bytes)),
            length: Some(length),
        }
    }

    /// The length of the source in bytes, if known up front.
    #[must_use]
    pub fn len(&self) -> Option<u64> {
        self.length
    }

    /// Whether the source is definitely empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == Some(0)
    }

    /// Reads one big-endian byte.
    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Reads exactly `n` bytes.
    pub fn read_n(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Skips exactly `n` bytes, failing with an `UnexpectedEof` if fewer remain.
    pub fn skip_n(&mut self, n: u64) -> io::Result<()> {
        let copied = io::copy(&mut (&mut self.inner).take(n), &mut io::sink())?;
        if copied != n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "truncated class file while skipping an attribute",
            ));
        }
        Ok(())
    }

    /// Peeks at the next byte without consuming it, returning `None` at end of stream.
    pub fn peek_u8(&mut self) -> io::Result<Option<u8>> {
        let buf = self.inner.fill_buf()?;
        Ok(buf.first().copied())
    }

    /// Reads the remainder of the source into a single buffer.
    pub fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.inner.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// The number of bytes consumed so far, for a source built over a known in-memory buffer.
    /// `None` for a file-backed source, where "position" isn't meaningful to callers here.
    pub(crate) fn position(&self) -> Option<u64> {
        match &self.inner {
            Inner::Memory(cursor) => Some(cursor.position()),
            Inner::File(_) => None,
        }
    }
}

impl Read for ByteSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_values() {
        let mut src = ByteSource::from_bytes(vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34]);
        assert_eq!(src.read_u32().unwrap(), 0xCAFE_BABE);
        assert_eq!(src.read_u16().unwrap(), 0x0034);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut src = ByteSource::from_bytes(vec![0x42, 0x43]);
        assert_eq!(src.peek_u8().unwrap(), Some(0x42));
        assert_eq!(src.read_u8().unwrap(), 0x42);
        assert_eq!(src.read_u8().unwrap(), 0x43);
        assert_eq!(src.peek_u8().unwrap(), None);
    }

    #[test]
    fn skip_n_fails_on_truncation() {
        let mut src = ByteSource::from_bytes(vec![1, 2, 3]);
        assert!(src.skip_n(10).is_err());
    }

    #[test]
    fn skip_n_advances_past_bytes() {
        let mut src = ByteSource::from_bytes(vec![1, 2, 3, 4]);
        src.skip_n(2).unwrap();
        assert_eq!(src.read_u16().unwrap(), 0x0304);
    }
}
