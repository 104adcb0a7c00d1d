//! Message boundary scanning
//!
//! [`Loader`] walks an mbox stream forward, line by line, and yields the
//! offset of every genuine envelope line it meets. It never seeks and never
//! re-reads a line; to get at a message, open a second handle on the same
//! bytes and seek it to the yielded offset (see [`crate::message`]).

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::boundary::{classify, has_envelope_prefix};
use crate::source::LineSource;
use crate::Result;

/// Labels attached to a message boundary
///
/// This crate never derives labels from message content; the set is empty
/// unless a [`Labeler`] supplies some.
pub type LabelSet = BTreeSet<String>;

/// Start of one message in the stream
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageBoundary {
    /// Absolute byte offset of the envelope line
    pub offset: u64,
    /// Labels from the loader's [`Labeler`]
    pub labels: LabelSet,
}

/// Hook for attaching labels to each boundary as it is found
pub trait Labeler {
    /// Labels for the message whose envelope line starts at `offset`
    fn labels(&self, offset: u64, envelope: &[u8]) -> LabelSet;
}

/// [`Labeler`] that attaches nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLabels;

impl Labeler for NoLabels {
    fn labels(&self, _offset: u64, _envelope: &[u8]) -> LabelSet {
        LabelSet::new()
    }
}

impl<F> Labeler for F
where
    F: Fn(u64, &[u8]) -> LabelSet,
{
    fn labels(&self, offset: u64, envelope: &[u8]) -> LabelSet {
        self(offset, envelope)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoaderState {
    Scanning,
    Exhausted,
}

/// Forward-only scanner yielding message boundaries
///
/// # Examples
///
/// ```
/// use mbox_rs::{LineReader, Loader};
/// use std::io::Cursor;
///
/// let mbox = "\
/// From alice@example.com Mon Apr 27 12:56:18 2009
/// Subject: first
///
/// From here on, nothing splits the message.
/// From bob@example.com Mon Apr 27 12:56:19 2009
/// Subject: second
///
/// bye
/// ";
///
/// let mut loader = Loader::new(LineReader::new(Cursor::new(mbox)));
/// assert_eq!(loader.next_boundary().unwrap().unwrap().offset, 0);
/// assert!(loader.next_boundary().unwrap().is_some());
/// assert!(loader.next_boundary().unwrap().is_none());
/// assert!(loader.is_exhausted());
/// ```
#[derive(Debug)]
pub struct Loader<S, L = NoLabels> {
    source: S,
    labeler: L,
    state: LoaderState,
    found: usize,
    failed: bool,
    line: Vec<u8>,
}

impl<S: LineSource> Loader<S> {
    /// Create a loader that attaches no labels
    pub fn new(source: S) -> Self {
        Self::with_labeler(source, NoLabels)
    }
}

impl<S: LineSource, L: Labeler> Loader<S, L> {
    /// Create a loader that labels each boundary with `labeler`
    pub fn with_labeler(source: S, labeler: L) -> Self {
        Self {
            source,
            labeler,
            state: LoaderState::Scanning,
            found: 0,
            failed: false,
            line: Vec::new(),
        }
    }

    /// Advance to the next envelope line
    ///
    /// Returns `Ok(None)` once the stream is exhausted, and on every call
    /// after that without touching the stream again. An IO error leaves the
    /// loader where it was, so a failing stream fails again on the next call.
    pub fn next_boundary(&mut self) -> Result<Option<MessageBoundary>> {
        if self.state == LoaderState::Exhausted {
            return Ok(None);
        }

        loop {
            let offset = self.source.position();
            self.line.clear();
            if self.source.read_line(&mut self.line)? == 0 {
                debug!("mbox exhausted at offset {} after {} messages", offset, self.found);
                self.state = LoaderState::Exhausted;
                return Ok(None);
            }

            if !has_envelope_prefix(&self.line) {
                continue;
            }
            match classify(&self.line) {
                Ok(()) => {
                    self.found += 1;
                    debug!("Message boundary at offset {}", offset);
                    let labels = self.labeler.labels(offset, &self.line);
                    return Ok(Some(MessageBoundary { offset, labels }));
                }
                Err(reason) => trace!(
                    "Not an envelope line at offset {} ({:?}): {:?}",
                    offset,
                    reason,
                    String::from_utf8_lossy(&self.line)
                ),
            }
        }
    }

    /// Whether the stream has been fully scanned
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == LoaderState::Exhausted
    }

    /// Offset of the next line the loader will examine
    #[must_use]
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// Number of boundaries yielded so far
    #[must_use]
    pub fn found(&self) -> usize {
        self.found
    }

    /// Unwrap, returning the line source
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: LineSource, L: Labeler> Iterator for Loader<S, L> {
    type Item = Result<MessageBoundary>;

    /// Ends after the first `Err`; call [`Loader::next_boundary`] directly
    /// to keep reading past an IO error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.next_boundary().transpose();
        self.failed = matches!(item, Some(Err(_)));
        item
    }
}
