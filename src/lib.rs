#![doc = include_str!("../README.md")]

/// Envelope line detection
pub mod boundary;
mod config;
mod error;
/// Header block reading and unfolding
pub mod header;
/// Message boundary scanning
pub mod loader;
/// Random access to messages by offset
pub mod message;
mod source;

pub use boundary::{is_boundary, parse_envelope, Envelope, Rejection};
pub use config::HeaderConfig;
pub use error::{MboxError, Result};
pub use header::{read_header, read_header_with, HeaderBlock};
pub use loader::{LabelSet, Labeler, Loader, MessageBoundary, NoLabels};
pub use message::{count_messages, read_header_at, read_message_body, read_raw_message};
pub use source::{trim_terminator, LineReader, LineSource};
