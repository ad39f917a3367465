//! The `.dec` deck format.
//!
//! Each record is two lines:
//!
//! ```text
//! ///mvid:101 qty:3 name:Lightning Bolt loc:Deck
//! 3 Lightning Bolt
//! ```
//!
//! Only the first line is read back. Import also understands the long
//! `identifier:` and `quantity:` labels.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

use cube_extract::models::CardId;
use cube_extract::{Extraction, Selector, Step};
use exn::{OptionExt, ResultExt};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::resolver::NameSource;

const RECORD_MARKER: &str = "///";
const ID_LABELS: [&str; 2] = ["mvid:", "identifier:"];
const QUANTITY_LABELS: [&str; 2] = ["qty:", "quantity:"];
const NAME_LABEL: &str = "name:";
const LOCATION_LABEL: &str = " loc:";
pub const DEFAULT_LOCATION: &str = "Deck";
/// Largest `qty:` accepted on import.
pub const MAX_QUANTITY: u32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub id: CardId,
    pub quantity: NonZeroU32,
    /// Advisory only; never used for identity.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckFileCodec {
    location: String,
}

impl Default for DeckFileCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

impl DeckFileCodec {
    /// `location` is written as `loc:` on every exported record.
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into() }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Parse every record, in file order.
    pub fn parse_entries(&self, text: &str) -> Result<Vec<DeckEntry>> {
        let lines: Vec<&str> = text.lines().collect();
        let end = lines.iter().rposition(|line| !line.trim().is_empty()).map_or(0, |last| last + 1);
        let mut entries = Vec::new();
        let mut index = 0;
        while index < end {
            let number = index + 1;
            let record = lines[index];
            let Some(fields) = record.strip_prefix(RECORD_MARKER) else {
                exn::bail!(ErrorKind::format(number, "expected a ///-prefixed record line"));
            };
            match lines.get(index + 1).filter(|_| index + 1 < end) {
                Some(count) if !count.starts_with(RECORD_MARKER) => {},
                _ => exn::bail!(ErrorKind::format(number, "record line has no count line after it")),
            }
            entries.push(parse_record(fields, number)?);
            index += 2;
        }
        Ok(entries)
    }

    /// Expand a deck into its identifiers, each repeated by its quantity.
    #[instrument(skip(self, text), fields(size = text.len()))]
    pub fn import(&self, text: &str) -> Result<Vec<CardId>> {
        let ids: Vec<CardId> = self
            .parse_entries(text)?
            .into_iter()
            .flat_map(|entry| std::iter::repeat_n(entry.id, entry.quantity.get() as usize))
            .collect();
        tracing::debug!(cards = ids.len(), "Deck imported");
        Ok(ids)
    }

    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<Vec<CardId>> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        self.import(&text)
    }

    /// Group identifiers into records in first-seen order, looking each
    /// distinct identifier's name up once.
    pub fn entries(&self, ids: &[CardId], names: &mut impl NameSource) -> Result<Vec<DeckEntry>> {
        let mut entries = Vec::new();
        for (id, quantity) in group(ids) {
            let name = names.name_of(id)?;
            entries.push(DeckEntry { id, quantity, name });
        }
        Ok(entries)
    }

    /// Records joined by `\n`, no trailing newline.
    pub fn render(&self, entries: &[DeckEntry]) -> String {
        entries
            .iter()
            .map(|entry| {
                let name = entry.name.replace(['\r', '\n'], " ");
                format!(
                    "///mvid:{} qty:{} name:{name} loc:{}\n{} {name}",
                    entry.id, entry.quantity, self.location, entry.quantity
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[instrument(skip(self, ids, names), fields(cards = ids.len()))]
    pub fn export(&self, ids: &[CardId], names: &mut impl NameSource) -> Result<String> {
        Ok(self.render(&self.entries(ids, names)?))
    }

    pub fn export_file(&self, path: impl AsRef<Path>, ids: &[CardId], names: &mut impl NameSource) -> Result<String> {
        let path = path.as_ref();
        let text = self.export(ids, names)?;
        fs::write(path, &text).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        tracing::info!(path = %path.display(), "Deck written");
        Ok(text)
    }
}

/// Count repeats, keeping the order in which identifiers first appear.
pub fn group(ids: &[CardId]) -> Vec<(CardId, NonZeroU32)> {
    let mut groups: Vec<(CardId, NonZeroU32)> = Vec::new();
    let mut positions: HashMap<CardId, usize> = HashMap::new();
    for &id in ids {
        match positions.entry(id) {
            Entry::Occupied(slot) => {
                let quantity = &mut groups[*slot.get()].1;
                *quantity = quantity.saturating_add(1);
            },
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push((id, NonZeroU32::MIN));
            },
        }
    }
    groups
}

fn parse_record(fields: &str, line: usize) -> Result<DeckEntry> {
    let id = labeled(fields, &ID_LABELS)
        .ok_or_raise(|| ErrorKind::format(line, "missing mvid: label"))?
        .parse::<CardId>()
        .or_raise(|| ErrorKind::format(line, "identifier is not a number"))?;
    let quantity = labeled(fields, &QUANTITY_LABELS)
        .ok_or_raise(|| ErrorKind::format(line, "missing qty: label"))?
        .parse::<NonZeroU32>()
        .or_raise(|| ErrorKind::format(line, "quantity is not a positive number"))?;
    if quantity.get() > MAX_QUANTITY {
        exn::bail!(ErrorKind::format(line, format!("quantity is larger than {MAX_QUANTITY}")));
    }
    // Names contain spaces, so the name runs up to the location label.
    let name = Extraction::new()
        .split(NAME_LABEL, Selector::range(Some(1), None))
        .split(LOCATION_LABEL, Selector::Index(0))
        .apply(fields)
        .map(|name| name.trim().to_string())
        .unwrap_or_default();
    Ok(DeckEntry { id, quantity, name })
}

/// The space-delimited token after the first of `labels` present.
fn labeled(fields: &str, labels: &[&str]) -> Option<String> {
    labels.iter().find_map(|label| {
        Extraction::from_iter([Step::new(*label, Selector::Index(1)), Step::new(" ", Selector::Index(0))])
            .apply(fields)
            .ok()
            .filter(|token| !token.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ids(raw: &[u64]) -> Vec<CardId> {
        raw.iter().copied().map(CardId).collect()
    }

    fn names() -> HashMap<CardId, String> {
        HashMap::from([(CardId(101), "Bolt".to_string()), (CardId(205), "Fog".to_string())])
    }

    const DECK: &str = "///mvid:101 qty:3 name:Bolt loc:Deck\n3 Bolt\n///mvid:205 qty:1 name:Fog loc:Deck\n1 Fog";

    #[test]
    fn test_import_expands_quantities() {
        let codec = DeckFileCodec::default();
        assert_eq!(codec.import(DECK).unwrap(), ids(&[101, 101, 101, 205]));
    }

    #[test]
    fn test_export_groups_in_first_seen_order() {
        let codec = DeckFileCodec::default();
        let text = codec.export(&ids(&[101, 101, 101, 205]), &mut names()).unwrap();
        assert_eq!(text, DECK);
    }

    #[test]
    fn test_export_interleaved_repeats() {
        let codec = DeckFileCodec::new("Sideboard");
        let text = codec.export(&ids(&[205, 101, 205]), &mut names()).unwrap();
        assert_eq!(
            text,
            "///mvid:205 qty:2 name:Fog loc:Sideboard\n2 Fog\n///mvid:101 qty:1 name:Bolt loc:Sideboard\n1 Bolt"
        );
    }

    #[test]
    fn test_export_empty() {
        assert_eq!(DeckFileCodec::default().export(&[], &mut names()).unwrap(), "");
        assert_eq!(DeckFileCodec::default().import("").unwrap(), vec![]);
    }

    #[test]
    fn test_long_labels_and_spaced_names() {
        let codec = DeckFileCodec::default();
        let entries = codec
            .parse_entries("///identifier:7 quantity:2 name:Lightning Bolt loc:Deck\n2 Lightning Bolt\n\n")
            .unwrap();
        assert_eq!(
            entries,
            vec![DeckEntry { id: CardId(7), quantity: NonZeroU32::new(2).unwrap(), name: "Lightning Bolt".to_string() }]
        );
    }

    #[test]
    fn test_round_trip() {
        let codec = DeckFileCodec::default();
        let original = ids(&[3, 1, 3, 2, 1, 3]);
        let text = codec.export(&original, &mut HashMap::<CardId, String>::new()).unwrap();
        let mut imported = codec.import(&text).unwrap();
        let mut expected = original.clone();
        imported.sort();
        expected.sort();
        assert_eq!(imported, expected);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let codec = DeckFileCodec::default();
        let text = codec.export(&ids(&[9]), &mut HashMap::<CardId, String>::new()).unwrap();
        assert_eq!(text, "///mvid:9 qty:1 name:Unknown loc:Deck\n1 Unknown");
    }

    #[rstest]
    #[case::not_a_record("3 Bolt\n///mvid:1 qty:3 name:Bolt loc:Deck", 1)]
    #[case::missing_id("///qty:3 name:Bolt loc:Deck\n3 Bolt", 1)]
    #[case::bad_id("///mvid:abc qty:3 name:Bolt loc:Deck\n3 Bolt", 1)]
    #[case::zero_quantity("///mvid:1 qty:1 name:A loc:Deck\n1 A\n///mvid:2 qty:0 name:B loc:Deck\n0 B", 3)]
    #[case::huge_quantity("///mvid:1 qty:4294967295 name:A loc:Deck\n4294967295 A", 1)]
    #[case::above_limit("///mvid:1 qty:1 name:A loc:Deck\n1 A\n///mvid:2 qty:10000 name:B loc:Deck\n10000 B", 3)]
    #[case::unpaired("///mvid:1 qty:1 name:A loc:Deck", 1)]
    #[case::two_records_in_a_row("///mvid:1 qty:1 name:A loc:Deck\n///mvid:2 qty:1 name:B loc:Deck\n1 B", 1)]
    #[case::blank_in_middle("///mvid:1 qty:1 name:A loc:Deck\n1 A\n\n///mvid:2 qty:1 name:B loc:Deck\n1 B", 3)]
    fn test_format_errors(#[case] text: &str, #[case] line: usize) {
        let err = DeckFileCodec::default().import(text).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Format { line: l, .. } if *l == line), "{:?}", *err);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.dec");
        let codec = DeckFileCodec::default();
        let written = codec.export_file(&path, &ids(&[101, 205, 101]), &mut names()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
        assert_eq!(codec.import_file(&path).unwrap(), ids(&[101, 101, 205]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeckFileCodec::default().import_file(dir.path().join("absent.dec")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }

    #[test]
    fn test_quantity_at_limit() {
        let text = format!("///mvid:1 qty:{MAX_QUANTITY} name:A loc:Deck\n{MAX_QUANTITY} A");
        assert_eq!(DeckFileCodec::default().import(&text).unwrap().len(), MAX_QUANTITY as usize);
    }

    #[test]
    fn test_group_many_distinct() {
        let many: Vec<CardId> = (0..5000).chain(0..5000).map(CardId).collect();
        let grouped = group(&many);
        assert_eq!(grouped.len(), 5000);
        assert_eq!(grouped[0], (CardId(0), NonZeroU32::new(2).unwrap()));
        assert_eq!(grouped[4999].0, CardId(4999));
    }

    #[test]
    fn test_group() {
        let grouped = group(&ids(&[4, 4, 2, 4]));
        let quantities: Vec<(u64, u32)> = grouped.iter().map(|(id, n)| (id.get(), n.get())).collect();
        assert_eq!(quantities, vec![(4, 3), (2, 1)]);
    }
}
