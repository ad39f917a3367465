//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use std::path::PathBuf;

use cube_cache::error::{Error as CacheError, ErrorKind as CacheErrorKind};
use derive_more::{Display, Error};

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document source failed; the child error says how.
    #[display("could not fetch card page")]
    Fetch,
    /// A lookup store could not be read or written.
    #[display("lookup store failure")]
    Cache,
    #[display("I/O error on {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Neither a `.dec` nor a `.coll2` file.
    #[display("unsupported file type: {}", _0.display())]
    UnsupportedFile(#[error(not(source))] PathBuf),
    /// Malformed deck or collection file. `line` is 1-based.
    #[display("line {line}: {reason}")]
    Format { line: usize, reason: String },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch | Self::Io(_))
    }

    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format { line, reason: reason.into() }
    }

    /// Lift a store error into the library tree. A failed computation is a
    /// fetch failure (the only fallible computation a lookup runs); anything
    /// else is the store itself.
    #[track_caller]
    pub(crate) fn cache(err: CacheError) -> Error {
        let kind = match *err {
            CacheErrorKind::Compute => Self::Fetch,
            CacheErrorKind::Io(_) | CacheErrorKind::InvalidData(_) => Self::Cache,
        };
        err.raise(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_format_display() {
        assert_eq!(ErrorKind::format(4, "missing qty: label").to_string(), "line 4: missing qty: label");
    }

    #[test]
    fn test_cache_lifting() {
        let compute = exn::Exn::from(CacheErrorKind::Compute);
        assert_eq!(*ErrorKind::cache(compute), ErrorKind::Fetch);
        let corrupt = exn::Exn::from(CacheErrorKind::InvalidData(Path::new("card.cache").to_path_buf()));
        assert_eq!(*ErrorKind::cache(corrupt), ErrorKind::Cache);
    }
}
