//! Memoized card lookups.
//!
//! Every lookup goes through its own [`CacheStore`] keyed by the lookup's
//! arguments, so a card page is fetched at most once per lookup kind for as
//! long as the store files survive.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cube_cache::CacheStore;
use cube_extract::models::{CardId, CardInfo, ColorIdentity, UNKNOWN};
use cube_extract::{DEFAULT_IMAGE_HOST, Extractor};
use cube_fetch::DocumentFetcher;
use cube_fetch::error::Error as FetchError;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub const CARD_STORE: &str = "card.cache";
pub const COLOR_STORE: &str = "color.cache";
pub const PRINTINGS_STORE: &str = "sets.cache";
pub const NAME_STORE: &str = "names.cache";

/// Display names for identifiers, as needed by deck export.
pub trait NameSource {
    fn name_of(&mut self, id: CardId) -> Result<String>;
}

impl NameSource for HashMap<CardId, String> {
    fn name_of(&mut self, id: CardId) -> Result<String> {
        Ok(self.get(&id).cloned().unwrap_or_else(|| UNKNOWN.to_string()))
    }
}

/// Resolves identifiers to card metadata through a [`DocumentFetcher`],
/// memoizing every answer on disk.
pub struct CardMetadataResolver<F> {
    fetcher: F,
    cache_dir: PathBuf,
    image_host: String,
    cards: CacheStore<(CardId,), CardInfo>,
    colors: CacheStore<(CardId,), ColorIdentity>,
    printings: CacheStore<(CardId,), Vec<CardId>>,
    names: CacheStore<(CardId,), String>,
}

impl<F: DocumentFetcher> CardMetadataResolver<F> {
    /// Stores live under `cache_dir` and are read on their first lookup.
    pub fn new(fetcher: F, cache_dir: impl AsRef<Path>) -> Self {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        Self {
            fetcher,
            image_host: DEFAULT_IMAGE_HOST.to_string(),
            cards: CacheStore::new(cache_dir.join(CARD_STORE)),
            colors: CacheStore::new(cache_dir.join(COLOR_STORE)),
            printings: CacheStore::new(cache_dir.join(PRINTINGS_STORE)),
            names: CacheStore::new(cache_dir.join(NAME_STORE)),
            cache_dir,
        }
    }

    pub fn with_image_host(mut self, host: impl Into<String>) -> Self {
        self.image_host = host.into();
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The full record for `id`.
    ///
    /// Never fails because of the page: a fetch failure or a page with no
    /// recognizable field is `Ok(None)` and is not stored, so a later run
    /// asks again. Only the store itself can make this fail.
    #[instrument(skip(self), fields(source = self.fetcher.name()))]
    pub fn card(&mut self, id: CardId) -> Result<Option<CardInfo>> {
        let fetcher = &self.fetcher;
        let image_host = self.image_host.as_str();
        self.cards
            .get_or_compute((id,), || {
                let document = match fetcher.fetch(id) {
                    Ok(document) => document,
                    Err(error) => {
                        tracing::warn!(%id, %error, "Card page unavailable; no record");
                        return Ok::<_, FetchError>(None);
                    },
                };
                let extracted = Extractor::new(document).with_image_host(image_host).card();
                if extracted.card.is_none() {
                    tracing::info!(%id, "No field could be read; no record");
                } else if !extracted.failures.is_empty() {
                    tracing::debug!(%id, missing = extracted.failures.len(), "Partial record");
                }
                Ok(extracted.card)
            })
            .map_err(ErrorKind::cache)
    }

    /// The card's name, or [`UNKNOWN`] when the page has no readable name
    /// (split cards). The sentinel is not stored.
    #[instrument(skip(self), fields(source = self.fetcher.name()))]
    pub fn name(&mut self, id: CardId) -> Result<String> {
        let fetcher = &self.fetcher;
        let name = self
            .names
            .get_or_compute((id,), || {
                let document = fetcher.fetch(id)?;
                match Extractor::new(document).name() {
                    Ok(name) if !name.is_empty() => Ok::<_, FetchError>(Some(name)),
                    Ok(_) => {
                        tracing::warn!(%id, "Name row is empty; split cards are not supported");
                        Ok(None)
                    },
                    Err(error) => {
                        tracing::warn!(%id, %error, "No name on page; split cards are not supported");
                        Ok(None)
                    },
                }
            })
            .map_err(ErrorKind::cache)?;
        Ok(name.unwrap_or_else(|| UNKNOWN.to_string()))
    }

    /// Colors named by every mana symbol on the page. A page without any
    /// mana row or text box has an empty identity.
    #[instrument(skip(self), fields(source = self.fetcher.name()))]
    pub fn color_identity(&mut self, id: CardId) -> Result<ColorIdentity> {
        let fetcher = &self.fetcher;
        self.colors
            .get_or_try_insert_with((id,), || {
                let document = fetcher.fetch(id)?;
                let identity = Extractor::new(document).color_identity().unwrap_or_else(|error| {
                    tracing::debug!(%id, %error, "No mana symbols on page");
                    ColorIdentity::default()
                });
                Ok::<_, FetchError>(identity)
            })
            .map_err(ErrorKind::cache)
    }

    /// Identifiers of every printing of the card.
    ///
    /// Split and double-faced pages have no "other printings" box; for those
    /// the answer is `[id]`, the one printing known for certain.
    #[instrument(skip(self), fields(source = self.fetcher.name()))]
    pub fn printings(&mut self, id: CardId) -> Result<Vec<CardId>> {
        let fetcher = &self.fetcher;
        self.printings
            .get_or_try_insert_with((id,), || {
                let document = fetcher.fetch(id)?;
                let printings = Extractor::new(document).other_printings().unwrap_or_else(|error| {
                    tracing::debug!(%id, %error, "Probably a split card or a single printing; using the identifier alone");
                    vec![id]
                });
                Ok::<_, FetchError>(printings)
            })
            .map_err(ErrorKind::cache)
    }
}

impl<F: DocumentFetcher> NameSource for CardMetadataResolver<F> {
    fn name_of(&mut self, id: CardId) -> Result<String> {
        self.name(id)
    }
}

impl<F: DocumentFetcher> std::fmt::Debug for CardMetadataResolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardMetadataResolver")
            .field("source", &self.fetcher.name())
            .field("cache_dir", &self.cache_dir)
            .field("image_host", &self.image_host)
            .finish_non_exhaustive()
    }
}
