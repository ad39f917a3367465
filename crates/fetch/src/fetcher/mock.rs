//! In-memory fetcher for testing.

use std::cell::RefCell;
use std::collections::HashMap;

use cube_extract::Document;
use cube_extract::models::CardId;

use super::DocumentFetcher;
use crate::error::{ErrorKind, Result};

/// In-memory fetcher for testing.
///
/// Serves canned HTML keyed by identifier and counts every call, so tests
/// can assert how often the network would have been hit. Unknown
/// identifiers are [`NotFound`](ErrorKind::NotFound); identifiers marked
/// with [`failing`](Self::failing) raise a [`Network`](ErrorKind::Network)
/// error.
///
/// # Examples
///
/// ```
/// use cube_extract::models::CardId;
/// use cube_fetch::{DocumentFetcher, MockFetcher};
///
/// let fetcher = MockFetcher::with_pages([(1u64, "<html></html>")]);
/// assert!(fetcher.fetch(CardId(1)).is_ok());
/// assert!(fetcher.fetch(CardId(2)).is_err());
/// assert_eq!(fetcher.calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<CardId, String>,
    failing: Vec<CardId>,
    calls: RefCell<HashMap<CardId, usize>>,
}

impl MockFetcher {
    pub fn with_pages(pages: impl IntoIterator<Item = (impl Into<CardId>, impl Into<String>)>) -> Self {
        Self {
            pages: pages.into_iter().map(|(id, html)| (id.into(), html.into())).collect(),
            ..Self::default()
        }
    }

    /// Make every fetch of `id` fail as if the connection dropped.
    pub fn failing(mut self, id: impl Into<CardId>) -> Self {
        self.failing.push(id.into());
        self
    }

    /// Total number of fetches, successful or not.
    pub fn calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    /// Number of fetches for one identifier.
    pub fn calls_for(&self, id: impl Into<CardId>) -> usize {
        self.calls.borrow().get(&id.into()).copied().unwrap_or(0)
    }
}

impl DocumentFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, id: CardId) -> Result<Document> {
        *self.calls.borrow_mut().entry(id).or_default() += 1;
        if self.failing.contains(&id) {
            exn::bail!(ErrorKind::Network("connection reset by mock".to_string()));
        }
        match self.pages.get(&id) {
            Some(html) => Ok(Document::parse(html)),
            None => exn::bail!(ErrorKind::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_call() {
        let fetcher = MockFetcher::with_pages([(1u64, "<p>one</p>")]).failing(2u64);
        assert!(fetcher.fetch(CardId(1)).is_ok());
        assert!(fetcher.fetch(CardId(1)).is_ok());
        assert_eq!(*fetcher.fetch(CardId(2)).unwrap_err(), ErrorKind::Network("connection reset by mock".to_string()));
        assert_eq!(*fetcher.fetch(CardId(3)).unwrap_err(), ErrorKind::NotFound(CardId(3)));
        assert_eq!(fetcher.calls_for(1u64), 2);
        assert_eq!(fetcher.calls_for(2u64), 1);
        assert_eq!(fetcher.calls(), 4);
    }

    #[test]
    fn test_through_handle() {
        let handle: super::super::FetcherHandle = Box::new(MockFetcher::with_pages([(5u64, "<p>x</p>")]));
        assert_eq!(handle.name(), "mock");
        assert!(handle.fetch(CardId(5)).is_ok());
    }
}
