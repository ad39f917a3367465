//! Card metadata resolution and the deck and collection file formats.
//!
//! The primary entry point is [`CardMetadataResolver`], which answers
//! lookups through a [`DocumentFetcher`](cube_fetch::DocumentFetcher) and
//! remembers every answer in its [stores](cube_cache). The codecs only need
//! a [`NameSource`] (for deck export), which the resolver is.

pub mod collection;
pub mod convert;
pub mod deck;
pub mod error;
mod resolver;

pub use crate::collection::CollectionFileCodec;
pub use crate::convert::{Converter, FileKind};
pub use crate::deck::{DeckEntry, DeckFileCodec};
pub use crate::resolver::{CARD_STORE, COLOR_STORE, CardMetadataResolver, NAME_STORE, NameSource, PRINTINGS_STORE};
