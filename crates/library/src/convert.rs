//! Conversion between deck and collection files, chosen by extension.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

use cube_extract::models::CardId;
use tracing::instrument;

use crate::collection::CollectionFileCodec;
use crate::deck::DeckFileCodec;
use crate::error::{ErrorKind, Result};
use crate::resolver::NameSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.dec`
    Deck,
    /// `.coll2`
    Collection,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some(ext) if ext.eq_ignore_ascii_case("dec") => Ok(Self::Deck),
            Some(ext) if ext.eq_ignore_ascii_case("coll2") => Ok(Self::Collection),
            _ => exn::bail!(ErrorKind::UnsupportedFile(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    pub deck: DeckFileCodec,
    pub collection: CollectionFileCodec,
}

impl Converter {
    pub fn new(deck: DeckFileCodec, collection: CollectionFileCodec) -> Self {
        Self { deck, collection }
    }

    pub fn read(&self, path: &Path) -> Result<Vec<CardId>> {
        match FileKind::from_path(path)? {
            FileKind::Deck => self.deck.import_file(path),
            FileKind::Collection => self.collection.import_file(path),
        }
    }

    /// Read `input` and write its cards to `output`; returns the number of
    /// identifiers read.
    ///
    /// A deck becomes a collection without quantities. A collection becomes
    /// a deck with one of each card, so names are looked up through `names`.
    #[instrument(skip(self, names), fields(input = %input.display(), output = %output.display()))]
    pub fn convert(&self, input: &Path, output: &Path, names: &mut impl NameSource) -> Result<usize> {
        let target = FileKind::from_path(output)?;
        let source = FileKind::from_path(input)?;
        let mut ids = self.read(input)?;
        let count = ids.len();
        match target {
            FileKind::Deck => {
                if source == FileKind::Collection {
                    let mut seen = HashSet::new();
                    ids.retain(|id| seen.insert(*id));
                }
                self.deck.export_file(output, &ids, names)?;
            },
            FileKind::Collection => {
                self.collection.export_file(output, &ids)?;
            },
        }
        Ok(count)
    }
}
