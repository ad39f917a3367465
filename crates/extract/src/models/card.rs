use std::fmt::{Display, Formatter, Result as FmtResult};

use super::{CardId, ColorIdentity};

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_PRINTING: &str = "UNK";
pub const UNKNOWN_NUMBER: i64 = -1;

/// Everything recoverable about one printing of a card.
///
/// Fields that could not be read keep their sentinel defaults (`"Unknown"`,
/// empty strings, `-1`). A `CardInfo` only exists if at least one field was
/// read; see [`CardInfoBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInfo {
    name: String,
    cost: String,
    text: String,
    flavor_text: String,
    // Stored raw ("Legendary Creature — Elf Druid") until the type line gets
    // a proper tokenizer; the three accessors all return the same string.
    type_line: String,
    image_link: String,
    power: String,
    toughness: String,
    printing: String,
    rarity: String,
    artist: String,
    color_identity: ColorIdentity,
    other_printings: Vec<CardId>,
    number: i64,
}
impl Default for CardInfo {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            cost: UNKNOWN.to_string(),
            text: String::new(),
            flavor_text: String::new(),
            type_line: String::new(),
            image_link: String::new(),
            power: String::new(),
            toughness: String::new(),
            printing: UNKNOWN_PRINTING.to_string(),
            rarity: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            color_identity: ColorIdentity::default(),
            other_printings: Vec::new(),
            number: UNKNOWN_NUMBER,
        }
    }
}
impl CardInfo {
    pub fn builder() -> CardInfoBuilder {
        CardInfoBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn cost(&self) -> &str {
        &self.cost
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn flavor_text(&self) -> &str {
        &self.flavor_text
    }
    pub fn supertypes(&self) -> &str {
        &self.type_line
    }
    pub fn types(&self) -> &str {
        &self.type_line
    }
    pub fn subtypes(&self) -> &str {
        &self.type_line
    }
    pub fn image_link(&self) -> &str {
        &self.image_link
    }
    pub fn power(&self) -> &str {
        &self.power
    }
    pub fn toughness(&self) -> &str {
        &self.toughness
    }
    pub fn printing(&self) -> &str {
        &self.printing
    }
    pub fn rarity(&self) -> &str {
        &self.rarity
    }
    pub fn artist(&self) -> &str {
        &self.artist
    }
    pub fn color_identity(&self) -> &ColorIdentity {
        &self.color_identity
    }
    pub fn other_printings(&self) -> &[CardId] {
        &self.other_printings
    }
    /// Collector number, `-1` when unknown.
    pub fn number(&self) -> i64 {
        self.number
    }
}

/// Renders the card as one `;`-separated spreadsheet row.
impl Display for CardInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let image = format!(r#"<img src="{}">"#, self.image_link);
        let colors = self.color_identity.to_string();
        let fields: [&str; 11] = [
            &self.name,
            &self.cost,
            &self.text,
            &self.flavor_text,
            &self.type_line,
            &image,
            &self.power,
            &self.printing,
            &self.rarity,
            &self.artist,
            &colors,
        ];
        let row: Vec<String> = fields.iter().map(|field| field.replace('\n', "<br>")).collect();
        f.write_str(&row.join(";"))
    }
}

/// Collects fields one at a time and remembers whether any were set.
#[derive(Debug, Default)]
pub struct CardInfoBuilder {
    card: CardInfo,
    populated: usize,
}
macro_rules! setter {
    ($method:ident, $field:ident) => {
        pub fn $method(&mut self, value: impl Into<String>) -> &mut Self {
            self.card.$field = value.into();
            self.populated += 1;
            self
        }
    };
}
impl CardInfoBuilder {
    setter!(name, name);
    setter!(cost, cost);
    setter!(text, text);
    setter!(flavor_text, flavor_text);
    setter!(type_line, type_line);
    setter!(image_link, image_link);
    setter!(power, power);
    setter!(toughness, toughness);
    setter!(printing, printing);
    setter!(rarity, rarity);
    setter!(artist, artist);

    pub fn color_identity(&mut self, value: ColorIdentity) -> &mut Self {
        self.card.color_identity = value;
        self.populated += 1;
        self
    }

    pub fn other_printings(&mut self, value: Vec<CardId>) -> &mut Self {
        self.card.other_printings = value;
        self.populated += 1;
        self
    }

    pub fn number(&mut self, value: i64) -> &mut Self {
        self.card.number = value;
        self.populated += 1;
        self
    }

    /// Number of setter calls so far.
    pub fn populated(&self) -> usize {
        self.populated
    }

    /// `None` when no field was ever set: "not found" is different from
    /// "found, but sparsely populated".
    pub fn build(self) -> Option<CardInfo> {
        (self.populated > 0).then_some(self.card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;

    #[test]
    fn test_empty_builder_is_no_record() {
        assert_eq!(CardInfo::builder().build(), None);
    }

    #[test]
    fn test_name_only_keeps_sentinels() {
        let mut builder = CardInfo::builder();
        builder.name("Fog");
        let card = builder.build().unwrap();
        assert_eq!(card.name(), "Fog");
        assert_eq!(card.cost(), UNKNOWN);
        assert_eq!(card.printing(), UNKNOWN_PRINTING);
        assert_eq!(card.number(), UNKNOWN_NUMBER);
        assert!(card.other_printings().is_empty());
        assert!(card.color_identity().is_empty());
    }

    #[test]
    fn test_display_row() {
        let mut builder = CardInfo::builder();
        builder
            .name("Lightning Bolt")
            .cost("{R}")
            .text("Lightning Bolt deals 3 damage\nto any target.")
            .type_line("Instant")
            .image_link("https://example.test/img")
            .printing("Limited Edition Alpha")
            .rarity("Common")
            .artist("Christopher Rush")
            .color_identity([Color::Red].into_iter().collect());
        let row = builder.build().unwrap().to_string();
        assert_eq!(
            row,
            "Lightning Bolt;{R};Lightning Bolt deals 3 damage<br>to any target.;;Instant;\
             <img src=\"https://example.test/img\">;;Limited Edition Alpha;Common;Christopher Rush;Red"
        );
    }
}
