//! Header block reading
//!
//! Reads the RFC 822 style header block of one message from a
//! [`LineSource`], unfolding continuation lines into a single value per
//! header name.
//!
//! Normalization rules:
//! - A continuation line (leading space or tab) is joined to the pending
//!   value with exactly one space, its own leading whitespace dropped.
//! - Whitespace after the colon and at the end of the value is dropped;
//!   whitespace inside the value is kept as written.
//! - `Message-Id` values lose one enclosing `<`/`>` pair.
//! - A header written with nothing after the colon has the value `""`,
//!   which is distinct from a header that never appeared.
//! - Lines that are neither a field nor a continuation are skipped.

use tracing::trace;

use crate::config::HeaderConfig;
use crate::source::{trim_terminator, LineSource};
use crate::Result;

/// Ordered mapping of header names to unfolded values
///
/// Names are kept exactly as written and looked up case-sensitively.
/// Iteration follows the order in which each name first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderBlock {
    fields: Vec<(String, String)>,
}

impl HeaderBlock {
    /// Create an empty header block
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a header by its exact name
    ///
    /// `None` means the header never appeared; a header present with no
    /// value yields `Some("")`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header ignoring ASCII case in the name
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header with this exact name is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Insert a value, replacing any existing value under the same name
    ///
    /// A replaced header keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Number of distinct header names
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the block holds no headers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate `(name, value)` pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Iterate header names in order of first appearance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
}

impl IntoIterator for HeaderBlock {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Read one header block using the default [`HeaderConfig`]
///
/// Consumes lines from the current position of `source` up to and including
/// the blank line that ends the block, leaving `source` at the first body
/// line. End of stream also ends the block.
///
/// # Examples
///
/// ```
/// use mbox_rs::{read_header, LineReader};
/// use std::io::Cursor;
///
/// let mut source = LineReader::new(Cursor::new(
///     "Subject: one two three\n  four five six\nMessage-Id: <one@bob.com>\n\nbody\n",
/// ));
/// let headers = read_header(&mut source).unwrap();
///
/// assert_eq!(headers.get("Subject"), Some("one two three four five six"));
/// assert_eq!(headers.get("Message-Id"), Some("one@bob.com"));
/// assert_eq!(headers.get("To"), None);
/// ```
pub fn read_header<S: LineSource + ?Sized>(source: &mut S) -> Result<HeaderBlock> {
    read_header_with(source, &HeaderConfig::default())
}

/// Read one header block with an explicit [`HeaderConfig`]
pub fn read_header_with<S: LineSource + ?Sized>(
    source: &mut S,
    config: &HeaderConfig,
) -> Result<HeaderBlock> {
    let mut block = HeaderBlock::new();
    let mut pending: Option<(String, String)> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if source.read_line(&mut buf)? == 0 {
            break;
        }

        let raw = trim_terminator(&buf);
        if is_end_of_headers(raw) {
            break;
        }
        let line = String::from_utf8_lossy(raw);

        if line.starts_with([' ', '\t']) {
            match pending.as_mut() {
                Some((_, value)) => append_continuation(value, &line),
                None => trace!("Skipping continuation line with no header: {:?}", line),
            }
            continue;
        }

        match split_field(&line) {
            Some((name, value)) => {
                if let Some((name, value)) = pending.take() {
                    flush(&mut block, name, value, config);
                }
                pending = Some((name.to_string(), value.to_string()));
            }
            None => trace!("Skipping malformed header line: {:?}", line),
        }
    }

    if let Some((name, value)) = pending {
        flush(&mut block, name, value, config);
    }

    Ok(block)
}

/// Blank line, or a line holding only a carriage return
fn is_end_of_headers(line: &[u8]) -> bool {
    line.is_empty() || line == b"\r"
}

/// Split `Name: value` into its name and the value with leading blanks dropped
///
/// The name must be non-empty and free of whitespace.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, value.trim_start_matches([' ', '\t'])))
}

fn append_continuation(value: &mut String, line: &str) {
    let content = line.trim_start_matches([' ', '\t']);
    if !value.is_empty() {
        value.push(' ');
    }
    value.push_str(content);
}

fn flush(block: &mut HeaderBlock, name: String, value: String, config: &HeaderConfig) {
    if config.keeps_first(&name) && block.contains(&name) {
        trace!("Keeping first {} header, dropping later value", name);
        return;
    }

    let mut value = value.trim_end();
    if config.unwrap_message_id && name.eq_ignore_ascii_case("Message-Id") {
        value = unwrap_angle_brackets(value);
    }
    block.insert(name, value);
}

fn unwrap_angle_brackets(value: &str) -> &str {
    match value.strip_prefix('<').and_then(|v| v.strip_suffix('>')) {
        Some(inner) => inner,
        None => value,
    }
}
