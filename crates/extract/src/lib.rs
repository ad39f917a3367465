//! Field extraction for card details pages.
//!
//! Two layers live here:
//! - [`Extraction`], a small interpreter over `(delimiter, selector)` steps
//!   for pulling labeled tokens out of flat text (deck lines, link
//!   addresses, "P / T" rows).
//! - [`Extractor`], which applies the field rule table to a parsed
//!   [`Document`] and builds a best-effort [`CardInfo`](models::CardInfo).
//!
//! Nothing in this crate performs I/O.

mod consts;
mod document;
pub mod error;
mod extract;
pub mod models;
mod split;

use tracing::instrument;

pub use crate::consts::DEFAULT_IMAGE_HOST;
pub use crate::document::{Document, Element, Predicate};
pub use crate::extract::{Extracted, Extractor, Field, FieldFailure, FieldRule, FieldValue};
pub use crate::split::{Extraction, Selector, Step};

/// Easy, top-level entrypoint: parse raw HTML and extract a card record.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract(html: &str) -> Extracted {
    Extractor::from_html(html).card()
}
