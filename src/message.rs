//! Random access to messages by boundary offset
//!
//! These helpers take an independently opened handle, seek it to an offset
//! previously yielded by [`Loader`](crate::Loader), and read from there.
//! They never share state with the loader that produced the offset.

use std::io::{BufRead, Seek};

use crate::boundary::is_boundary;
use crate::config::HeaderConfig;
use crate::header::{read_header_with, HeaderBlock};
use crate::loader::Loader;
use crate::source::{LineReader, LineSource};
use crate::{MboxError, Result};

/// Seek to `offset` and consume the envelope line found there
fn open_envelope<R: BufRead + Seek>(reader: R, offset: u64) -> Result<(LineReader<R>, Vec<u8>)> {
    let mut source = LineReader::seek_to(reader, offset)?;
    let mut envelope = Vec::new();
    source.read_line(&mut envelope)?;
    if !is_boundary(&envelope) {
        return Err(MboxError::InvalidOffset(offset));
    }
    Ok((source, envelope))
}

/// Append lines to `out` until the next envelope line or end of stream
fn read_until_boundary<S: LineSource>(source: &mut S, out: &mut Vec<u8>) -> Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if source.read_line(&mut line)? == 0 || is_boundary(&line) {
            return Ok(());
        }
        out.extend_from_slice(&line);
    }
}

/// Read the header block of the message whose envelope line is at `offset`
///
/// # Examples
///
/// ```
/// use mbox_rs::{read_header_at, HeaderConfig};
/// use std::io::Cursor;
///
/// let mbox = "From bob@bob.com Mon Apr 27 12:56:19 2009\nSubject: hi\n\nbody\n";
/// let headers = read_header_at(Cursor::new(mbox), 0, &HeaderConfig::default()).unwrap();
/// assert_eq!(headers.get("Subject"), Some("hi"));
/// ```
pub fn read_header_at<R: BufRead + Seek>(
    reader: R,
    offset: u64,
    config: &HeaderConfig,
) -> Result<HeaderBlock> {
    let (mut source, _) = open_envelope(reader, offset)?;
    read_header_with(&mut source, config)
}

/// Read a whole message, envelope line included, up to the next boundary
pub fn read_raw_message<R: BufRead + Seek>(reader: R, offset: u64) -> Result<Vec<u8>> {
    let (mut source, mut raw) = open_envelope(reader, offset)?;
    read_until_boundary(&mut source, &mut raw)?;
    Ok(raw)
}

/// Read the body of a message: everything after its header block up to the
/// next boundary
pub fn read_message_body<R: BufRead + Seek>(reader: R, offset: u64) -> Result<Vec<u8>> {
    let (mut source, _) = open_envelope(reader, offset)?;
    read_header_with(&mut source, &HeaderConfig::default())?;
    let mut body = Vec::new();
    read_until_boundary(&mut source, &mut body)?;
    Ok(body)
}

/// Count the messages in a stream by draining a fresh [`Loader`]
pub fn count_messages<S: LineSource>(source: S) -> Result<usize> {
    let mut loader = Loader::new(source);
    while loader.next_boundary()?.is_some() {}
    Ok(loader.found())
}
