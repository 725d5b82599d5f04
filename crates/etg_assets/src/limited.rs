//! Range-restricted stream wrapper.
//!
//! A [`LimitedStream`] exposes only `[offset, offset + length)` of an underlying
//! seekable stream. Positions reported by and passed to the wrapper are relative
//! to the start of the window, and the window's size is reported as the stream
//! length, so consumers cannot tell it apart from a stream holding just those bytes.

use std::io::{self, Read, Seek, SeekFrom};

/// A view over a sub-range of a seekable stream.
#[derive(Debug)]
pub struct LimitedStream<R> {
    inner: R,
    offset: u64,
    length: u64,
    pos: u64,
}

impl<R: Read + Seek> LimitedStream<R> {
    /// Wrap `inner`, exposing `length` bytes starting at `offset`.
    pub fn new(inner: R, offset: u64, length: u64) -> Self {
        Self {
            inner,
            offset,
            length,
            pos: 0,
        }
    }

    /// Size of the window, independent of the underlying stream size.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Offset of the window inside the underlying stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read the whole window into a buffer.
    ///
    /// If the underlying stream ends before the window does, the buffer holds
    /// only the bytes actually available.
    pub fn into_buffer(mut self) -> io::Result<Vec<u8>> {
        let end = self.inner.seek(SeekFrom::End(0))?;
        let available = end.saturating_sub(self.offset).min(self.length);
        self.inner.seek(SeekFrom::Start(self.offset))?;
        let mut buffer = Vec::with_capacity(usize::try_from(available).unwrap_or(0));
        (&mut self.inner).take(self.length).read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> Read for LimitedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.length || buf.is_empty() {
            return Ok(0);
        }

        let remaining = self.length - self.pos;
        let max = buf.len().min(usize::try_from(remaining).unwrap_or(usize::MAX));

        let start = self.offset.checked_add(self.pos).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "window position overflows the stream")
        })?;
        self.inner.seek(SeekFrom::Start(start))?;
        let read = self.inner.read(&mut buf[..max])?;
        self.pos += read as u64;
        Ok(read)
    }
}

impl<R: Read + Seek> Seek for LimitedStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
            SeekFrom::End(delta) => self.length.checked_add_signed(delta),
        };

        match target {
            Some(target) => {
                self.pos = target;
                Ok(target)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
