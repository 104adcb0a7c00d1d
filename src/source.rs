//! Line-oriented access to an mbox byte stream
//!
//! Header reading and boundary scanning only ever need two things from a
//! stream: the next line, and the absolute offset of the next unread byte.
//! [`LineSource`] captures exactly that, so neither depends on a concrete
//! reader type.

use std::io::{BufRead, Seek, SeekFrom};

use crate::Result;

/// A forward-only source of lines with a known byte position
pub trait LineSource {
    /// Append the next line, terminator included, to `buf`
    ///
    /// Returns the number of bytes appended, `0` at end of stream. The final
    /// line of a stream may lack a trailing LF.
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<usize>;

    /// Absolute offset of the next byte `read_line` will return
    fn position(&self) -> u64;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        (**self).read_line(buf)
    }

    fn position(&self) -> u64 {
        (**self).position()
    }
}

/// [`LineSource`] over any buffered reader
///
/// Positions are counted from the offset the reader was at when wrapped,
/// so a reader seeked into the middle of a file reports absolute offsets.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    position: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a reader positioned at the start of the stream
    pub fn new(inner: R) -> Self {
        Self::at(inner, 0)
    }

    /// Wrap a reader already positioned at `offset`
    pub fn at(inner: R, offset: u64) -> Self {
        Self {
            inner,
            position: offset,
        }
    }

    /// Unwrap, returning the reader at its current position
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Borrow the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

impl<R: BufRead + Seek> LineReader<R> {
    /// Seek `inner` to `offset` and wrap it
    pub fn seek_to(mut inner: R, offset: u64) -> Result<Self> {
        inner.seek(SeekFrom::Start(offset))?;
        Ok(Self::at(inner, offset))
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        let n = self.inner.read_until(b'\n', buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn position(&self) -> u64 {
        self.position
    }
}

/// Strip one LF, then one CR, from the end of a raw line
pub fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
