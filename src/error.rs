//! mbox error types

use thiserror::Error;

/// Errors surfaced while reading an mbox stream
///
/// Parsing itself is lenient: malformed header lines and body text that
/// looks like an envelope line are never errors. Only the underlying
/// stream and bad caller-supplied offsets produce an `Err`.
#[derive(Error, Debug)]
pub enum MboxError {
    /// IO error while reading or seeking the stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Offset does not point at an envelope line
    #[error("No envelope line at offset {0}")]
    InvalidOffset(u64),
}

/// Result type alias using MboxError
pub type Result<T> = std::result::Result<T, MboxError>;
