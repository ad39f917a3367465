//! The field rule table: which part of the page each [`CardInfo`] field
//! comes from, and how it is read.
//!
//! [`CardInfo`]: crate::models::CardInfo

use derive_more::Display;
use exn::{OptionExt, ResultExt};

use super::Extractor;
use crate::consts;
use crate::document::Predicate;
use crate::error::{ErrorKind, Result};
use crate::models::{CardId, CardInfoBuilder, ColorIdentity};
use crate::split::Step;

/// A [`CardInfo`](crate::models::CardInfo) field, as named in diagnostics.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    #[display("name")]
    Name,
    #[display("cost")]
    Cost,
    #[display("text")]
    Text,
    #[display("flavor_text")]
    FlavorText,
    #[display("types")]
    Types,
    #[display("image_link")]
    ImageLink,
    #[display("power_toughness")]
    PowerToughness,
    #[display("printing")]
    Printing,
    #[display("rarity")]
    Rarity,
    #[display("number")]
    Number,
    #[display("artist")]
    Artist,
    #[display("color_identity")]
    ColorIdentity,
    #[display("other_printings")]
    OtherPrintings,
}

/// A value produced by a rule, before it is stored on the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Stats { power: String, toughness: Option<String> },
    Number(i64),
    Colors(ColorIdentity),
    Printings(Vec<CardId>),
}

/// How a field is read from the page.
#[derive(Clone, Copy)]
pub enum FieldRule {
    /// Locate the element with `container_id`, then its first descendant
    /// with class `value_class`, and read its trimmed text.
    Direct {
        container_id: &'static str,
        value_class: &'static str,
    },
    /// Anything that needs more than one element or post-processing.
    Custom(fn(&Extractor) -> Result<FieldValue>),
}
impl FieldRule {
    const fn direct(container_id: &'static str) -> Self {
        Self::Direct { container_id, value_class: consts::VALUE_CLASS }
    }

    pub(crate) fn apply(&self, extractor: &Extractor) -> Result<FieldValue> {
        match *self {
            Self::Direct { container_id, value_class } => {
                extractor.direct_text(container_id, value_class).map(FieldValue::Text)
            },
            Self::Custom(rule) => rule(extractor),
        }
    }
}

/// Every field of a card record, in the order they are attempted.
pub(crate) const RULES: [(Field, FieldRule); 13] = [
    (Field::Name, FieldRule::direct(consts::NAME_ROW)),
    (Field::Cost, FieldRule::Custom(mana_cost)),
    (Field::Text, FieldRule::direct(consts::TEXT_ROW)),
    (Field::FlavorText, FieldRule::Direct { container_id: consts::FLAVOR_ROW, value_class: consts::FLAVOR_CLASS }),
    (Field::Types, FieldRule::direct(consts::TYPE_ROW)),
    (Field::ImageLink, FieldRule::Custom(image_link)),
    (Field::PowerToughness, FieldRule::Custom(power_toughness)),
    (Field::Printing, FieldRule::direct(consts::SET_ROW)),
    (Field::Rarity, FieldRule::direct(consts::RARITY_ROW)),
    (Field::Number, FieldRule::Custom(number)),
    (Field::Artist, FieldRule::direct(consts::ARTIST_ROW)),
    (Field::ColorIdentity, FieldRule::Custom(color_identity)),
    (Field::OtherPrintings, FieldRule::Custom(other_printings)),
];

/// Store a rule's value on the builder. A value of the wrong shape for the
/// field is a rule-table bug, reported like any other parse failure.
pub(crate) fn store(builder: &mut CardInfoBuilder, field: Field, value: FieldValue) -> Result<()> {
    match (field, value) {
        (Field::Name, FieldValue::Text(v)) => builder.name(v),
        (Field::Cost, FieldValue::Text(v)) => builder.cost(v),
        (Field::Text, FieldValue::Text(v)) => builder.text(v),
        (Field::FlavorText, FieldValue::Text(v)) => builder.flavor_text(v),
        (Field::Types, FieldValue::Text(v)) => builder.type_line(v),
        (Field::ImageLink, FieldValue::Text(v)) => builder.image_link(v),
        (Field::PowerToughness, FieldValue::Stats { power, toughness }) => match toughness {
            Some(toughness) => builder.power(power).toughness(toughness),
            None => builder.power(power),
        },
        (Field::Printing, FieldValue::Text(v)) => builder.printing(v),
        (Field::Rarity, FieldValue::Text(v)) => builder.rarity(v),
        (Field::Number, FieldValue::Number(v)) => builder.number(v),
        (Field::Artist, FieldValue::Text(v)) => builder.artist(v),
        (Field::ColorIdentity, FieldValue::Colors(v)) => builder.color_identity(v),
        (Field::OtherPrintings, FieldValue::Printings(v)) => builder.other_printings(v),
        (field, value) => exn::bail!(ErrorKind::ParseError {
            field: "rule value",
            value: format!("{field} cannot hold {value:?}"),
        }),
    };
    Ok(())
}

fn mana_cost(extractor: &Extractor) -> Result<FieldValue> {
    let value = extractor.direct_element(consts::MANA_ROW, consts::VALUE_CLASS)?;
    let symbols: String = value
        .find_all(Predicate::Tag("img"))
        .iter()
        .filter_map(|img| img.attr("alt"))
        .map(|alt| format!("{{{}}}", alt.trim()))
        .collect();
    if !symbols.is_empty() {
        return Ok(FieldValue::Text(symbols));
    }
    let text = value.text().trim().to_string();
    if text.is_empty() {
        exn::bail!(ErrorKind::MissingElement("mana symbols"));
    }
    Ok(FieldValue::Text(text))
}

fn image_link(extractor: &Extractor) -> Result<FieldValue> {
    let image = extractor
        .document()
        .find(Predicate::Id(consts::CARD_IMAGE))
        .ok_or_raise(|| ErrorKind::MissingElement("card image"))?;
    let src = image.attr("src").ok_or_raise(|| ErrorKind::MissingAttribute("src"))?;
    let link = match src.strip_prefix(consts::IMAGE_RELATIVE_PREFIX) {
        Some(path) => format!("{}{}", extractor.image_host(), path),
        None if src.starts_with("http://") || src.starts_with("https://") => src.to_string(),
        None => format!("{}/{}", extractor.image_host(), src.trim_start_matches('/')),
    };
    Ok(FieldValue::Text(link))
}

fn power_toughness(extractor: &Extractor) -> Result<FieldValue> {
    let row = extractor.direct_text(consts::PT_ROW, consts::VALUE_CLASS)?;
    let power = Step::new("/", 0).apply(&row)?.trim().to_string();
    // Planeswalker loyalty sits in the same row with no slash.
    let toughness = Step::new("/", 1).apply(&row).ok().map(|t| t.trim().to_string());
    Ok(FieldValue::Stats { power, toughness })
}

fn number(extractor: &Extractor) -> Result<FieldValue> {
    let text = extractor.direct_text(consts::NUMBER_ROW, consts::VALUE_CLASS)?;
    // Collector numbers of variants carry a letter suffix ("123a").
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    let number = digits.parse::<i64>().or_raise(|| ErrorKind::ParseError { field: "number", value: text.clone() })?;
    Ok(FieldValue::Number(number))
}

fn color_identity(extractor: &Extractor) -> Result<FieldValue> {
    extractor.color_identity().map(FieldValue::Colors)
}

fn other_printings(extractor: &Extractor) -> Result<FieldValue> {
    extractor.other_printings().map(FieldValue::Printings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_field_has_exactly_one_rule() {
        let fields: HashSet<Field> = RULES.iter().map(|(field, _)| *field).collect();
        assert_eq!(fields.len(), RULES.len());
    }

    #[test]
    fn test_store_rejects_mismatched_value() {
        let mut builder = CardInfoBuilder::default();
        assert!(store(&mut builder, Field::Number, FieldValue::Text("12".to_string())).is_err());
        assert_eq!(builder.populated(), 0);
    }

    #[test]
    fn test_store_loyalty_only_sets_power() {
        let mut builder = CardInfoBuilder::default();
        store(&mut builder, Field::PowerToughness, FieldValue::Stats { power: "3".to_string(), toughness: None }).unwrap();
        let card = builder.build().unwrap();
        assert_eq!(card.power(), "3");
        assert_eq!(card.toughness(), "");
    }
}
