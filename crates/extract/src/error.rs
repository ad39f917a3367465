//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A single-index selector pointed outside of the split parts.
    #[display("index {index} out of range for {len} parts")]
    OutOfRange {
        /// The index as requested (may be negative).
        index: isize,
        /// Number of parts produced by the split.
        len: usize,
    },
    /// A range selector whose resolved start lies after its resolved end.
    #[display("invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Resolved start position.
        start: usize,
        /// Resolved end position.
        end: usize,
    },
    /// A step asked to split on the empty string.
    #[display("delimiter must not be empty")]
    EmptyDelimiter,
    /// The step sequence was empty, so there was nothing to extract.
    #[display("no extraction steps given")]
    EmptyExtraction,
    /// An element the rule depends on is not in the document.
    #[display("missing element: {_0}")]
    MissingElement(#[error(not(source))] &'static str),
    /// An element was found but lacks a required attribute.
    #[display("missing attribute: {_0}")]
    MissingAttribute(#[error(not(source))] &'static str),
    /// A value was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The document either has the structure or it doesn't; asking again
        // won't change the answer.
        false
    }
}
