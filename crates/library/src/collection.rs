//! The `.coll2` collection format.
//!
//! ```text
//! doc:
//! - version: 1
//! - items:
//!   - - id: 3
//!     - r: 1
//!   - - id: 7
//!     - r: 1
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use cube_extract::{Selector, Step};
use cube_extract::models::CardId;
use exn::ResultExt;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub const HEADER: [&str; 3] = ["doc:", "- version: 1", "- items:"];
const ID_MARKER: &str = "  - - id:";
const ID_LABEL: &str = "id: ";
const RATING_MARKER: &str = "    - r:";
pub const DEFAULT_RATING: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionFileCodec {
    rating: u32,
}

impl Default for CollectionFileCodec {
    fn default() -> Self {
        Self::new(DEFAULT_RATING)
    }
}

impl CollectionFileCodec {
    /// `rating` is written as `r:` on every exported record.
    pub fn new(rating: u32) -> Self {
        Self { rating }
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }

    /// Identifiers in file order. Repeats are kept.
    #[instrument(skip(self, text), fields(size = text.len()))]
    pub fn import(&self, text: &str) -> Result<Vec<CardId>> {
        let lines: Vec<&str> = text.lines().collect();
        for (index, expected) in HEADER.iter().enumerate() {
            match lines.get(index) {
                Some(line) if line == expected => {},
                _ => exn::bail!(ErrorKind::format(index + 1, format!("expected header line {expected:?}"))),
            }
        }
        let end = lines.iter().rposition(|line| !line.trim().is_empty()).map_or(0, |last| last + 1).max(HEADER.len());
        let mut ids = Vec::new();
        let mut index = HEADER.len();
        while index < end {
            let number = index + 1;
            let line = lines[index];
            if !line.starts_with(ID_MARKER) {
                exn::bail!(ErrorKind::format(number, "expected an id line"));
            }
            let id = Step::new(ID_LABEL, Selector::Index(1))
                .apply(line)
                .or_raise(|| ErrorKind::format(number, "missing id: label"))?
                .parse::<CardId>()
                .or_raise(|| ErrorKind::format(number, "identifier is not a number"))?;
            match lines.get(index + 1).filter(|_| index + 1 < end) {
                Some(marker) if marker.starts_with(RATING_MARKER) => {},
                _ => exn::bail!(ErrorKind::format(number + 1, "expected a rating line")),
            }
            ids.push(id);
            index += 2;
        }
        tracing::debug!(cards = ids.len(), "Collection imported");
        Ok(ids)
    }

    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<CardId>> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        self.import(&text)
    }

    /// Header then one record per distinct identifier, ascending; joined by
    /// `\n` with no trailing newline.
    pub fn export(&self, ids: &[CardId]) -> String {
        let unique: BTreeSet<CardId> = ids.iter().copied().collect();
        HEADER
            .iter()
            .map(|line| line.to_string())
            .chain(unique.iter().map(|id| format!("{ID_MARKER} {id}\n{RATING_MARKER} {}", self.rating)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[instrument(skip(self, path, ids), fields(path = %path.as_ref().display(), cards = ids.len()))]
    pub fn export_file(&self, path: impl AsRef<Path>, ids: &[CardId]) -> Result<String> {
        let path = path.as_ref();
        let text = self.export(ids);
        fs::write(path, &text).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        tracing::info!(path = %path.display(), "Collection written");
        Ok(text)
    }
}
