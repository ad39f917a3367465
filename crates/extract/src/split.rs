//! Delimiter slicing for pulling labeled tokens out of semi-structured text.
//!
//! An [`Extraction`] is a small program: a sequence of [`Step`]s, each of
//! which splits the current text on a delimiter and keeps a selection of the
//! parts. A range selection is joined back together with the same delimiter,
//! so the next step sees ordinary text again.
//!
//! ```rust
//! use cube_extract::Extraction;
//!
//! let line = "///mvid:3921 qty:4 name:Lightning Bolt loc:Deck";
//! let mvid = Extraction::new().split("mvid:", 1..).split(" ", 0).apply(line).unwrap();
//! assert_eq!(mvid, "3921");
//! ```

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Which of the split parts a [`Step`] keeps.
///
/// Negative positions count from the end, the same way `-1` means "last".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selector {
    /// Keep exactly one part. Out of range is an error.
    Index(isize),
    /// Keep a half-open run of parts; `None` means "from the start" or "to
    /// the end". Bounds outside the parts are clamped.
    Range {
        start: Option<isize>,
        end: Option<isize>,
    },
}
impl Selector {
    pub fn range(start: Option<isize>, end: Option<isize>) -> Self {
        Self::Range { start, end }
    }

    fn select(&self, parts: &[&str], delimiter: &str) -> Result<String> {
        let len = parts.len();
        match *self {
            Self::Index(index) => {
                let position = if index < 0 { len.checked_sub(index.unsigned_abs()) } else { Some(index as usize) };
                match position.and_then(|p| parts.get(p)) {
                    Some(part) => Ok((*part).to_string()),
                    None => exn::bail!(ErrorKind::OutOfRange { index, len }),
                }
            },
            Self::Range { start, end } => {
                let start = start.map_or(0, |s| clamp(s, len));
                let end = end.map_or(len, |e| clamp(e, len));
                if start > end {
                    exn::bail!(ErrorKind::InvalidRange { start, end });
                }
                Ok(parts[start..end].join(delimiter))
            },
        }
    }
}

fn clamp(position: isize, len: usize) -> usize {
    if position < 0 { len.saturating_sub(position.unsigned_abs()) } else { (position as usize).min(len) }
}

impl From<isize> for Selector {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}
impl From<(Option<isize>, Option<isize>)> for Selector {
    fn from((start, end): (Option<isize>, Option<isize>)) -> Self {
        Self::Range { start, end }
    }
}
impl From<Range<isize>> for Selector {
    fn from(range: Range<isize>) -> Self {
        Self::range(Some(range.start), Some(range.end))
    }
}
impl From<RangeFrom<isize>> for Selector {
    fn from(range: RangeFrom<isize>) -> Self {
        Self::range(Some(range.start), None)
    }
}
impl From<RangeTo<isize>> for Selector {
    fn from(range: RangeTo<isize>) -> Self {
        Self::range(None, Some(range.end))
    }
}
impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Self::range(None, None)
    }
}

/// One split-and-select instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub delimiter: String,
    pub selector: Selector,
}
impl Step {
    pub fn new(delimiter: impl Into<String>, selector: impl Into<Selector>) -> Self {
        Self { delimiter: delimiter.into(), selector: selector.into() }
    }

    /// Run this step on its own.
    pub fn apply(&self, source: &str) -> Result<String> {
        if self.delimiter.is_empty() {
            exn::bail!(ErrorKind::EmptyDelimiter);
        }
        let parts: Vec<&str> = source.split(self.delimiter.as_str()).collect();
        self.selector.select(&parts, &self.delimiter)
    }
}

/// An ordered chain of [`Step`]s, applied left to right.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    steps: Vec<Step>,
}
impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn split(mut self, delimiter: impl Into<String>, selector: impl Into<Selector>) -> Self {
        self.steps.push(Step::new(delimiter, selector));
        self
    }

    /// Run every step in order, feeding each output into the next.
    ///
    /// An empty chain is an error rather than the identity, because a rule
    /// with no steps is always a mistake in the rule.
    #[instrument(level = "trace", skip(self), fields(steps = self.steps.len()))]
    pub fn apply(&self, source: &str) -> Result<String> {
        if self.steps.is_empty() {
            exn::bail!(ErrorKind::EmptyExtraction);
        }
        let mut current = source.to_string();
        for step in &self.steps {
            current = step.apply(&current)?;
        }
        Ok(current)
    }
}
impl FromIterator<Step> for Extraction {
    fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
        Self { steps: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_chained_extraction() {
        let extraction = Extraction::new().split(":", (Some(1), None)).split(" ", (None, Some(1)));
        assert_eq!(extraction.apply("a:b c:d").unwrap(), "b");
    }


    #[test]
    fn test_collected_steps() {
        let extraction: Extraction = [Step::new("mvid:", 1..), Step::new(" ", 0)].into_iter().collect();
        assert_eq!(extraction, Extraction::new().split("mvid:", 1..).split(" ", 0));
        assert_eq!(extraction.apply("///mvid:101 qty:3 name:Bolt").unwrap(), "101");
    }

    #[rstest]
    #[case("a=b=c", "=", Selector::Index(0), "a")]
    #[case("a=b=c", "=", Selector::Index(2), "c")]
    #[case("a=b=c", "=", Selector::Index(-1), "c")]
    #[case("a=b=c", "=", Selector::Index(-3), "a")]
    #[case("a=b=c", "=", (1..).into(), "b=c")]
    #[case("a=b=c", "=", (..2).into(), "a=b")]
    #[case("a=b=c", "=", (1..2).into(), "b")]
    #[case("a=b=c", "=", (..).into(), "a=b=c")]
    #[case("a=b=c", "=", (-2..).into(), "b=c")]
    #[case("a=b=c", "=", (1..10).into(), "b=c")]
    #[case("a=b=c", "=", (5..).into(), "")]
    #[case("no delimiter here", "=", Selector::Index(0), "no delimiter here")]
    #[case("  - - id: 42", "id: ", Selector::Index(1), "42")]
    fn test_single_step(#[case] source: &str, #[case] delimiter: &str, #[case] selector: Selector, #[case] expected: &str) {
        assert_eq!(Step::new(delimiter, selector).apply(source).unwrap(), expected);
    }

    #[rstest]
    #[case(Selector::Index(1))]
    #[case(Selector::Index(-2))]
    fn test_missing_delimiter_only_has_index_zero(#[case] selector: Selector) {
        let err = Step::new("=", selector).apply("plain").unwrap_err();
        assert!(matches!(*err, ErrorKind::OutOfRange { len: 1, .. }));
    }

    #[test]
    fn test_range_start_after_end() {
        let err = Step::new("=", 2..1).apply("a=b=c").unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidRange { start: 2, end: 1 });
    }

    #[test]
    fn test_empty_delimiter() {
        let err = Step::new("", 0).apply("abc").unwrap_err();
        assert_eq!(*err, ErrorKind::EmptyDelimiter);
    }

    #[test]
    fn test_empty_chain() {
        let err = Extraction::new().apply("abc").unwrap_err();
        assert_eq!(*err, ErrorKind::EmptyExtraction);
    }

    #[test]
    fn test_failure_stops_chain() {
        let extraction = Extraction::new().split("qty:", 1).split(" ", 0);
        assert!(extraction.apply("///mvid:101 name:Bolt").is_err());
    }

    #[rstest]
    #[case("a:b:c:d", ":")]
    #[case("x--y--z", "--")]
    #[case("::", ":")]
    #[case("leading:", ":")]
    fn test_split_join_reconstructs_source(#[case] source: &str, #[case] delimiter: &str) {
        let parts = source.split(delimiter).count() as isize;
        for i in 1..parts {
            let head = Step::new(delimiter, ..i).apply(source).unwrap();
            let tail = Step::new(delimiter, i..).apply(source).unwrap();
            assert_eq!(format!("{head}{delimiter}{tail}"), source, "split at part {i}");
        }
        assert_eq!(Step::new(delimiter, ..).apply(source).unwrap(), source);
    }
}
