//! Sources of card details pages.

pub mod error;
mod fetcher;

#[cfg(feature = "mock")]
pub use crate::fetcher::MockFetcher;
pub use crate::fetcher::{DEFAULT_URL_TEMPLATE, DocumentFetcher, FetcherHandle, HttpFetcher, ID_PLACEHOLDER};
