//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing file could not be read or written.
    #[display("cache store I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The backing file exists but does not decode. Delete it to start over.
    #[display("invalid cache data: {}", _0.display())]
    InvalidData(#[error(not(source))] PathBuf),
    /// The wrapped computation failed; nothing was cached.
    #[display("cached computation failed")]
    Compute,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Compute)
    }
}
