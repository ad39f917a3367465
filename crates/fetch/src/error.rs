//! Fetch Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use cube_extract::models::CardId;
use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The address template cannot produce a usable address.
    #[display("invalid source address: {_0}")]
    InvalidAddress(#[error(not(source))] String),
    /// Connection, TLS or body transfer failure.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The source answered with a non-success status.
    #[display("unexpected HTTP status {_0}")]
    Status(#[error(not(source))] u16),
    /// The source has no page for this identifier.
    #[display("no document for card {_0}")]
    NotFound(#[error(not(source))] CardId),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Nothing in this workspace retries; the answer is for callers that
    /// want to.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status(code) => *code >= 500,
            Self::InvalidAddress(_) | Self::NotFound(_) => false,
        }
    }
}
