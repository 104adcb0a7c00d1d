//! Envelope line detection
//!
//! mbox has no escaping rule that writers reliably follow, so a body line
//! may start with `From ` just like a real envelope line. A line only counts
//! as a message boundary when it passes all three checks:
//!
//! 1. it starts with the literal `From `
//! 2. a sender token (non-empty, no whitespace) follows, then a blank
//! 3. the rest is a ctime-shaped timestamp:
//!    `Mon Apr 27 12:56:18 2009`, optionally with zone tokens before the
//!    year (`Mon Apr 27 12:56:18 PDT 2009`)
//!
//! "From sea to shining sea", "From bob@bob.com I get only spam." and a
//! bare "From bob@bob.com" all fail check 3.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Literal prefix of every envelope line
pub const ENVELOPE_PREFIX: &[u8] = b"From ";

const WEEKDAYS: [&[u8]; 7] = [b"Mon", b"Tue", b"Wed", b"Thu", b"Fri", b"Sat", b"Sun"];

const MONTHS: [&[u8]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov",
    b"Dec",
];

/// Why a line was not accepted as an envelope line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Does not start with `From `
    NoPrefix,
    /// No whitespace-free sender token followed by a blank
    NoSender,
    /// The text after the sender is not timestamp-shaped
    NoTimestamp,
}

/// Whether `line` opens a new message
///
/// Total and side-effect free: any byte sequence, with or without its line
/// terminator, yields a plain `true`/`false`.
///
/// # Examples
///
/// ```
/// use mbox_rs::is_boundary;
///
/// assert!(is_boundary(b"From bob@bob.com Mon Apr 27 12:56:19 2009\n"));
/// assert!(!is_boundary(b"From sea to shining sea\n"));
/// assert!(!is_boundary(b"From bob@bob.com   \n"));
/// ```
#[must_use]
pub fn is_boundary(line: &[u8]) -> bool {
    classify(line).is_ok()
}

/// Run all three checks, returning the first one that fails
pub fn classify(line: &[u8]) -> Result<(), Rejection> {
    let rest = line
        .strip_prefix(ENVELOPE_PREFIX)
        .ok_or(Rejection::NoPrefix)?;
    let (_, tail) = sender_token(rest).ok_or(Rejection::NoSender)?;
    if is_timestamp(tail) {
        Ok(())
    } else {
        Err(Rejection::NoTimestamp)
    }
}

/// Check 1: the line starts with the literal `From `
#[must_use]
pub fn has_envelope_prefix(line: &[u8]) -> bool {
    line.starts_with(ENVELOPE_PREFIX)
}

/// Check 2: split the sender token off the text following `From `
///
/// Returns the sender and the remainder with its leading blanks dropped.
/// The sender must be non-empty and must be followed by a space or tab,
/// so a line that ends right after the sender has no envelope tail.
pub fn sender_token(rest: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = rest.iter().position(|&b| is_blank(b))?;
    if end == 0 {
        return None;
    }
    let sender = &rest[..end];
    if sender.iter().any(|b| b.is_ascii_whitespace()) {
        return None;
    }
    Some((sender, trim_start_blanks(&rest[end..])))
}

/// Check 3: whether `tail` is a ctime-shaped timestamp
#[must_use]
pub fn is_timestamp(tail: &[u8]) -> bool {
    parse_timestamp(tail).is_some()
}

/// Fields of an envelope timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
struct Timestamp {
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    zone: Vec<String>,
    year: i32,
}

fn parse_timestamp(tail: &[u8]) -> Option<Timestamp> {
    let tokens: Vec<&[u8]> = tail
        .trim_ascii_end()
        .split(|&b| is_blank(b))
        .filter(|t| !t.is_empty())
        .collect();

    let [weekday, month, day, time, rest @ ..] = tokens.as_slice() else {
        return None;
    };
    let (year, zone) = rest.split_last()?;

    if !WEEKDAYS.contains(weekday) {
        return None;
    }
    let month = MONTHS.iter().position(|m| m == month)? as u32 + 1;
    let day = parse_digits(day, 1, 2).filter(|d| (1..=31).contains(d))?;
    let (hour, minute, second) = parse_time(time)?;
    if !zone.iter().all(|z| is_zone(z)) {
        return None;
    }
    let year = parse_digits(year, 4, 4)? as i32;

    Some(Timestamp {
        month,
        day,
        hour,
        minute,
        second,
        zone: zone
            .iter()
            .map(|z| String::from_utf8_lossy(z).into_owned())
            .collect(),
        year,
    })
}

/// `h:mm`, `hh:mm` or either followed by `:ss`
fn parse_time(token: &[u8]) -> Option<(u32, u32, u32)> {
    let mut parts = token.split(|&b| b == b':');
    let hour = parse_digits(parts.next()?, 1, 2)?;
    let minute = parse_digits(parts.next()?, 2, 2)?;
    let second = match parts.next() {
        Some(s) => parse_digits(s, 2, 2)?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((hour, minute, second))
}

/// Zone abbreviation (`PDT`, `UTC`) or numeric offset (`+0200`)
fn is_zone(token: &[u8]) -> bool {
    match token {
        [b'+' | b'-', digits @ ..] => digits.len() == 4 && digits.iter().all(u8::is_ascii_digit),
        _ => (1..=5).contains(&token.len()) && token.iter().all(u8::is_ascii_uppercase),
    }
}

fn parse_digits(token: &[u8], min: usize, max: usize) -> Option<u32> {
    if token.len() < min || token.len() > max || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        token
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0')),
    )
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trim_start_blanks(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| !is_blank(b)).unwrap_or(bytes.len());
    &bytes[start..]
}

/// A parsed envelope line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// Sender token, usually the envelope return path
    pub sender: String,
    /// Delivery time as written, `None` if the fields are not a real
    /// calendar date and time (e.g. `Feb 31`)
    pub date: Option<NaiveDateTime>,
    /// Zone tokens between the time and the year, not applied to `date`
    pub zone: Vec<String>,
}

/// Parse an envelope line into its sender and timestamp
///
/// Returns `None` for any line [`is_boundary`] rejects.
///
/// # Examples
///
/// ```
/// use mbox_rs::parse_envelope;
/// use chrono::{Datelike, Timelike};
///
/// let env = parse_envelope(b"From sup-talk-bounces@rubyforge.org Mon Apr 27 12:56:18 2009")
///     .unwrap();
/// assert_eq!(env.sender, "sup-talk-bounces@rubyforge.org");
///
/// let date = env.date.unwrap();
/// assert_eq!(date.year(), 2009);
/// assert_eq!(date.hour(), 12);
/// ```
pub fn parse_envelope(line: &[u8]) -> Option<Envelope> {
    let rest = line.strip_prefix(ENVELOPE_PREFIX)?;
    let (sender, tail) = sender_token(rest)?;
    let ts = parse_timestamp(tail)?;

    let date = NaiveDate::from_ymd_opt(ts.year, ts.month, ts.day)
        .zip(NaiveTime::from_hms_opt(ts.hour, ts.minute, ts.second))
        .map(|(d, t)| d.and_time(t));

    Some(Envelope {
        sender: String::from_utf8_lossy(sender).into_owned(),
        date,
        zone: ts.zone,
    })
}
