//! Document fetcher trait and implementations.
//!
//! A [`DocumentFetcher`] turns a card identifier into the parsed details
//! page for that card. Everything above this seam (caching, extraction,
//! file codecs) is indifferent to where the page came from.

mod http;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::{DEFAULT_URL_TEMPLATE, HttpFetcher, ID_PLACEHOLDER};
#[cfg(feature = "mock")]
pub use self::mock::MockFetcher;
use crate::error::Result;
use cube_extract::Document;
use cube_extract::models::CardId;

/// A boxed fetcher, for callers that pick the implementation at runtime.
pub type FetcherHandle = Box<dyn DocumentFetcher>;

/// Retrieve the details page for a card.
///
/// Calls are blocking and sequential; one request per call, no retries.
///
/// # Examples
///
/// ```
/// use cube_extract::models::CardId;
/// use cube_fetch::{DocumentFetcher, error::Result};
///
/// fn card_name(fetcher: &dyn DocumentFetcher, id: CardId) -> Result<String> {
///     let document = fetcher.fetch(id)?;
///     Ok(cube_extract::Extractor::new(document).name().unwrap_or_default())
/// }
/// ```
pub trait DocumentFetcher {
    /// Name of the source, used for logging only.
    fn name(&self) -> &str;

    /// Fetch and parse the page for `id`.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) when the
    /// source positively knows no such card; any other failure is a
    /// transport problem.
    fn fetch(&self, id: CardId) -> Result<Document>;
}

impl<T: DocumentFetcher + ?Sized> DocumentFetcher for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, id: CardId) -> Result<Document> {
        (**self).fetch(id)
    }
}

impl<T: DocumentFetcher + ?Sized> DocumentFetcher for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&self, id: CardId) -> Result<Document> {
        (**self).fetch(id)
    }
}
